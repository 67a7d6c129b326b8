use anyhow::Result;
use clap::Args;
use deluxe_core::meta::sharpen::{SHARPEN_DELUXE, SHARPEN_DELUXE_PROPERTIES};
use deluxe_core::ops::{create_operation, operation_names};

use crate::summary::{print_operation_keys, print_property_table};

#[derive(Args)]
pub struct InfoArgs {
    /// Also list the child operations and their properties
    #[arg(long)]
    pub children: bool,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    print_operation_keys(&SHARPEN_DELUXE);
    print_property_table("Properties", SHARPEN_DELUXE_PROPERTIES);

    if args.children {
        for name in operation_names() {
            let op = create_operation(name)?;
            print_operation_keys(op.info());
            print_property_table("Properties", op.properties());
        }
    }

    Ok(())
}
