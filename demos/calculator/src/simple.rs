//! Simple calculator demo
//!
//! Creates a SimpleCalculator directly, adds two numbers, negotiates the
//! base interface and releases every reference.
//!
//! USAGE:
//!   simple-com [OPTIONS]
//!
//! EXAMPLES:
//!   simple-com                        # Add 10 + 20
//!   simple-com -a 7 -b 35             # Custom operands
//!   simple-com --verbosity trace      # Show every acquire and release

mod common;

use clap::Parser;
use com_runtime::activation::protocol;
use com_runtime::components::create_simple_calculator;
use com_runtime::{iid, ISimpleCalculator};
use common::*;

#[derive(Parser, Debug)]
#[command(name = "simple-com")]
#[command(version)]
#[command(about = "Simple COM demo - direct creation, one interface")]
struct Args {
    /// First operand
    #[arg(short, long, default_value_t = 10)]
    a: i32,

    /// Second operand
    #[arg(short, long, default_value_t = 20)]
    b: i32,

    /// Log verbosity
    #[arg(long, value_enum, default_value_t = Verbosity::Debug)]
    verbosity: Verbosity,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing(args.verbosity)?;

    banner("Simple COM Component");

    println!("Step 1: create the object");
    let calc = create_simple_calculator(&iid::ISIMPLECALCULATOR)?
        .into_interface::<dyn ISimpleCalculator>()
        .map_err(|_| "SimpleCalculator does not implement ISimpleCalculator")?;
    println!("  refs = {}", calc.ref_count());

    println!("Step 2: call Add");
    let mut result = 0;
    let hr = calc.add(args.a, args.b, Some(&mut result));
    report(&format!("{} + {}", args.a, args.b), hr, result);

    println!("Step 3: QueryInterface for IUnknown");
    let mut unknown = None;
    let hr = protocol::query_interface(&calc, &iid::IUNKNOWN, Some(&mut unknown));
    println!("  {:?}, refs = {}", hr, calc.ref_count());
    if let Some(unknown) = unknown {
        println!("  released IUnknown, refs = {}", unknown.release());
    }

    println!("Step 4: release the object");
    println!("  refs = {}", calc.release());

    banner("Done");
    Ok(())
}
