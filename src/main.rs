use anyhow::Result;
use clap::Parser;
use scholar_pubs::args::Args;
use scholar_pubs::run;

pub fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let summary = run(&args)?;
    println!(
        "Saved {} publications in {} year groups to {}",
        summary.publications,
        summary.groups,
        args.output.display()
    );
    Ok(())
}
