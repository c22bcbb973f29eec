use clap::Parser;
use lb_treeview::cli::{init_logging, run, Cli};
use lb_treeview::display::{print_error, print_info};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.log_level());

    if let Err(e) = run(cli).await {
        let connection_failed = e.is_connection();
        let err = anyhow::Error::from(e);

        if connection_failed {
            print_error(&err.to_string());
            print_info(
                "Make sure OpenStack credentials are set in OS_* environment variables or in clouds.yaml",
            );
        } else {
            print_error(&format!("Error: {}", err));
        }
        eprintln!("{:?}", err);
        std::process::exit(1);
    }
}
