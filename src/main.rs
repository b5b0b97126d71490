use tailgraph::{cli, observability};

fn main() {
    observability::init_logging();
    if let Err(err) = cli::run() {
        tracing::error!(error = %err, "fatal");
        std::process::exit(1);
    }
}
