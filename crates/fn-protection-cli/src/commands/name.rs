//! Name command - print the guard name derived for a resource

use fn_protection_engine::derive_name;

use crate::error::Result;

pub fn run(kind: &str, name: &str, namespace: Option<&str>) -> Result<()> {
    println!("{}", derive_name(kind, name, namespace));
    Ok(())
}
