use acs_to_sqlite::{
    cli::{Cli, Commands},
    metadata::read_lookup,
    writer::load_release,
};
use anyhow::Result;
use std::time::Instant;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let cli = Cli::parse_args();

    match cli.command {
        Commands::Load {
            input_dir,
            output_db,
            lookup,
        } => {
            let start = Instant::now();

            let stats = load_release(&input_dir, &output_db, &lookup)?;

            let elapsed = start.elapsed();
            println!(
                "\nCreated {:?} ({} tables, {} geographies, {} data rows) in {:.1}s",
                output_db,
                stats.tables,
                stats.geographies,
                stats.data_rows,
                elapsed.as_secs_f64()
            );
        }

        Commands::Tables { input_dir, lookup } => {
            let lookup = read_lookup(&input_dir.join(lookup))?;
            println!("Tables in this release:\n");
            for table in &lookup.tables {
                println!("  {:10} {}", table.table_id, table.table_title);
            }
        }
    }

    Ok(())
}
