//! Checkout Session Example
//!
//! This example runs a scripted shopping session against a fixture set, lets the promotion timers
//! run for a while, then prints the receipt.
//!
//! Use `-f` to load a fixture set by name
//! Use `-s` to seed the promotion random source
//! Use `-t` to set how many simulated seconds the promotion timers run for
//! Use `-d` to price as of a given date (e.g. `2024-01-02`, a Tuesday)

use std::{io, io::Write, time::Duration};

use anyhow::Result;
use clap::Parser;
use humanize_duration::{Truncate, prelude::DurationExt};
use rand::{SeedableRng, rngs::StdRng};

use checkout::{
    clock::{Clock, FixedClock, SystemClock},
    fixtures::Fixture,
    logging::init_subscriber,
    products::ProductId,
    receipt::Receipt,
    session::Session,
    state::Intent,
    utils::ExampleSessionArgs,
};

/// Checkout Session Example
pub fn main() -> Result<()> {
    let args = ExampleSessionArgs::parse();

    init_subscriber(&args.log_level, args.log_format)?;

    let fixture = Fixture::from_set(&args.fixture)?;
    let date = args.date.unwrap_or_else(|| SystemClock.today());

    let mut session = Session::new(
        fixture.catalog()?.clone(),
        fixture.config().clone(),
        StdRng::seed_from_u64(args.seed),
        FixedClock(date),
    );

    let p1 = ProductId::from("p1");
    let p2 = ProductId::from("p2");

    let script = [
        Intent::AddToCart(p1.clone()),
        Intent::ChangeQuantity(p1.clone(), 9),
        Intent::AddToCart(p2.clone()),
        Intent::IncreaseQuantity(p2.clone()),
        Intent::AddToCart(ProductId::from("p4")),
        Intent::DecreaseQuantity(p2.clone()),
        Intent::RemoveFromCart(ProductId::from("p3")),
    ];

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    writeln!(handle, "Pricing as of {date} ({:?})", date.weekday())?;

    for intent in &script {
        if let Some(notice) = session.dispatch(intent) {
            writeln!(handle, " ! {intent:?}: {notice}")?;
        }
    }

    for _ in 0..args.ticks {
        for event in session.advance(Duration::from_secs(1))? {
            writeln!(
                handle,
                " [{}] {}",
                session.schedule().now().human(Truncate::Nano),
                event.message()
            )?;
        }
    }

    let low_stock = session.state().catalog().low_stock_info();

    if !low_stock.is_empty() {
        writeln!(handle, "\n{low_stock}")?;
    }

    let receipt = Receipt::new(
        session.state().cart(),
        &fixture.config().pricing,
        session.pricing(),
    );

    receipt.write_to(&mut handle)?;

    Ok(())
}
