use crate::cli::Cli;
use crate::config::resolve_layout;
use crate::error::Result;
use qcbatch::workflows;

pub fn run(cli: &Cli) -> Result<()> {
    let layout = resolve_layout(cli)?;
    for name in workflows::discover::run(&layout)? {
        println!("{}", name);
    }
    Ok(())
}
