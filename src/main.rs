use PFRsim::Examples::pfr_examples::pfr_examples;
use PFRsim::Utils::logger::init_logger;
use simplelog::LevelFilter;

pub fn main() {
    //
    if let Err(e) = init_logger(LevelFilter::Info, None) {
        eprintln!("logger is not initialized: {}", e);
    }
    let task: usize = 0;
    pfr_examples(task);
}
