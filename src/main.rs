use env_logger::Env;
use natded::cli::run_cli;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    run_cli();
}
