use quote_core::cli::{run_cli, CliError};

const USAGE: &str = "usage: quote_core_cli [--session <session-id>]";

fn main() -> Result<(), CliError> {
    quote_core::init();

    let mut session = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--session" => {
                let Some(id) = args.next() else {
                    eprintln!("{USAGE}");
                    return Ok(());
                };
                session = Some(id);
            }
            "--help" | "-h" => {
                println!("{USAGE}");
                return Ok(());
            }
            other => {
                eprintln!("Unknown argument `{other}`.\n{USAGE}");
                return Ok(());
            }
        }
    }

    run_cli(session)
}
