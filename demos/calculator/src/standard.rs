//! Standard calculator demo
//!
//! Walks the factory-mediated flow: look up the class factory, create a
//! Calculator through it, run the four operations, negotiate IUnknown and
//! release both objects.
//!
//! USAGE:
//!   standard-com [OPTIONS]
//!
//! EXAMPLES:
//!   standard-com                      # 100 and 50
//!   standard-com -a 10 -b 0           # Shows the division error
//!   standard-com --factory-mode shared

mod common;

use clap::Parser;
use com_runtime::activation::{protocol, IClassFactory};
use com_runtime::{clsid, iid, ComRuntime, ICalculator};
use common::*;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "standard-com")]
#[command(version)]
#[command(about = "Standard COM demo - class factory and four-operation calculator")]
struct Args {
    /// First operand
    #[arg(short, long, default_value_t = 100)]
    a: i32,

    /// Second operand
    #[arg(short, long, default_value_t = 50)]
    b: i32,

    /// How the registry produces class factories
    #[arg(long, value_enum, default_value_t = Mode::PerLookup)]
    factory_mode: Mode,

    /// Hold a server lock while the calculator is in use
    #[arg(long)]
    lock: bool,

    /// Log verbosity
    #[arg(long, value_enum, default_value_t = Verbosity::Debug)]
    verbosity: Verbosity,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing(args.verbosity)?;

    let runtime = ComRuntime::builder()
        .factory_mode(args.factory_mode.into())
        .standard_components()
        .build();
    info!("Registered classes: {:?}", runtime.registry().classes());

    banner("Standard COM Component");

    println!("Step 1: get the class factory");
    let mut class_object = None;
    let hr = protocol::get_class_object(
        runtime.registry(),
        &clsid::CALCULATOR,
        &iid::ICLASSFACTORY,
        Some(&mut class_object),
    );
    hr.ok()?;
    let factory = class_object
        .and_then(|ptr| ptr.into_interface::<dyn IClassFactory>().ok())
        .ok_or("class object does not implement IClassFactory")?;
    println!("  factory refs = {}", factory.ref_count());

    if args.lock {
        factory.lock_server(true).ok()?;
    }

    println!("Step 2: create the Calculator");
    let calc = factory.create::<dyn ICalculator>()?;
    println!("  calculator refs = {}", calc.ref_count());

    println!("Step 3: use the Calculator");
    let (a, b) = (args.a, args.b);
    let mut result = 0;
    let hr = calc.add(a, b, Some(&mut result));
    report(&format!("{} + {}", a, b), hr, result);
    let hr = calc.subtract(a, b, Some(&mut result));
    report(&format!("{} - {}", a, b), hr, result);
    let hr = calc.multiply(a, b, Some(&mut result));
    report(&format!("{} * {}", a, b), hr, result);
    let hr = calc.divide(a, b, Some(&mut result));
    report(&format!("{} / {}", a, b), hr, result);

    println!("Step 4: QueryInterface for IUnknown");
    let unknown = calc.query(&iid::IUNKNOWN)?;
    println!("  calculator refs = {}", calc.ref_count());
    println!("  released IUnknown, refs = {}", unknown.release());

    println!("Step 5: release the objects");
    println!("  calculator refs = {}", calc.release());
    if args.lock {
        factory.lock_server(false).ok()?;
    }
    println!("  factory refs = {}", factory.release());
    println!("  can unload: {}", runtime.can_unload_now());

    banner("Done");
    Ok(())
}
