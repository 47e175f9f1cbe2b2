use clap::Parser;

fn main() -> anyhow::Result<()> {
    jbst::init();

    jbst::cli::Cli::parse().run()
}
