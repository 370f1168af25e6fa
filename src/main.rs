use clap::Parser;

fn main() -> anyhow::Result<()> {
    let args = photo_editor::cli::CliArgs::parse();
    photo_editor::run(&args)?;
    Ok(())
}
