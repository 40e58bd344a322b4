use std::process::ExitCode;

use env_logger::Env;

use roster_batch::{
    item::console::ConsoleItemWriter,
    loader::{DEFAULT_INPUT_PATH, LoaderBuilder},
};

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let writer = ConsoleItemWriter::stdout();

    let result = LoaderBuilder::new()
        .open(DEFAULT_INPUT_PATH)
        .and_then(|loader| loader.run(&writer));

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            // Diagnostics go to stdout along with the report.
            println!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}
