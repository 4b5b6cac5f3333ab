use clap::Parser;
use modelscope_image_pusher::cli::Args;
use modelscope_image_pusher::{Config, Logger};
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            return ExitCode::from(1);
        }
        Err(e) => e.exit(),
    };

    let output = if args.quiet {
        Logger::new_quiet()
    } else {
        Logger::new(args.verbose)
    };

    let config = match Config::from_env(&args) {
        Ok(config) => config,
        Err(e) => {
            output.error(&e.to_string());
            Args::print_examples();
            return ExitCode::from(1);
        }
    };

    match modelscope_image_pusher::run(config, output.clone()).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            output.error(&e.to_string());
            ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1))
        }
    }
}
