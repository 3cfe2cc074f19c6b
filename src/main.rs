use clap::{App, Arg};
use std::path::PathBuf;
use stela::build::{build_site, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing to stderr so the output directory's contents are the
/// only thing on stdout's side of the world. `RUST_LOG` overrides the
/// default filter.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "stela=info".into()),
    );
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let matches = App::new("stela")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Builds a sectioned weblog from a JSON manifest")
        .arg(
            Arg::with_name("out")
                .short("o")
                .long("out")
                .value_name("DIR")
                .help("Output directory")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::with_name("manifest")
                .short("m")
                .long("manifest")
                .value_name("FILE")
                .help("Site manifest (JSON)")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::with_name("source")
                .short("s")
                .long("source")
                .value_name("DIR")
                .help("Directory containing the article directories")
                .takes_value(true)
                .default_value("."),
        )
        .get_matches();

    init_tracing();

    let config = Config {
        // clap enforces presence of the required args and supplies the
        // `source` default, so value_of can't return None here.
        output_directory: PathBuf::from(matches.value_of("out").unwrap()),
        manifest_path: PathBuf::from(matches.value_of("manifest").unwrap()),
        source_directory: PathBuf::from(matches.value_of("source").unwrap()),
    };

    if let Err(err) = build_site(&config) {
        tracing::error!("{}", err);
        std::process::exit(1);
    }
}
