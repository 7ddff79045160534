#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
//! ** Astral **
//! Text adventure aboard a drifting starship, driven by natural-language commands.

use astral_engine::style::GameStyle;
use astral_engine::{ASTRAL_VERSION, CommandParser, WorldModel, load_world, run_repl};

use anyhow::{Context, Result};
use colored::Colorize;
use log::info;
use textwrap::{fill, termwidth};

use std::io::Write;

fn main() -> Result<()> {
    env_logger::init();
    info!("Start: loading Astral world (engine v{ASTRAL_VERSION})...");
    let mut world = load_world().context("while loading AstralWorld")?;
    info!("AstralWorld loaded successfully.");

    let mut parser = CommandParser::new(&world.snapshot()).context("while building the command parser")?;

    // clear the screen
    print!("\x1B[2J\x1B[H");
    std::io::stdout().flush()?;
    info!("Starting the game!");

    let width = termwidth();
    println!("{:^width$}", world.title.to_uppercase().bright_yellow().underline());
    println!("\n{}\n", fill(&world.intro, width).description_style());

    run_repl(&mut world, &mut parser)
}
