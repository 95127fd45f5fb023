mod logging;
mod sample;

use clap::{ArgAction, Parser};
use color_eyre::eyre::{Result, WrapErr, eyre};
use dialogui::prelude::*;
use dialogui::surface::{HeadlessSurface, ScriptStep};
use serde_json::json;
use tracing::debug;

use crate::logging::{LogConfig, init_logging};
use crate::sample::SampleState;

#[derive(Debug, Parser)]
#[command(
    name = "dialogui",
    version,
    about = "Build the sample dialog on a headless surface and drive it from the command line",
    long_about = "Builds the sample dialog, then applies edits, toggles and presses in that order. \
                  Paths are '/'-separated labels, e.g. 'Quality/>>' or 'Channels/GREEN'."
)]
struct Cli {
    /// Edit a value: LABEL=VALUE (JSON literals are parsed, anything else is text)
    #[arg(short = 's', long = "set", value_name = "LABEL=VALUE", action = ArgAction::Append)]
    sets: Vec<String>,

    /// Toggle a checkbox by label path
    #[arg(short = 't', long = "toggle", value_name = "PATH", action = ArgAction::Append)]
    toggles: Vec<String>,

    /// Press a button by label path
    #[arg(short = 'p', long = "press", value_name = "PATH", action = ArgAction::Append)]
    presses: Vec<String>,

    /// Build into the canvas instead of a window
    #[arg(long)]
    in_place: bool,

    /// Title of the host window
    #[arg(long, default_value = "Sample")]
    title: String,

    /// Print a JSON snapshot instead of the outline
    #[arg(long)]
    json: bool,

    /// Close the dialog before exiting, disposing its state
    #[arg(long)]
    close: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_logging(&LogConfig::from_flags(cli.verbose, cli.quiet));

    let mut surface = HeadlessSurface::new();
    let state = StateHandle::new(SampleState::default());
    let builder = DialogBuilder::<SampleState>::new(DialogConfig::default())
        .wrap_err("sample dialog declaration is invalid")?;
    let built = if cli.in_place {
        builder.build_in_place(&mut surface, &state, None)
    } else {
        builder
            .build_window(&mut surface, &cli.title, &state, false)
            .map(|(_, dialog)| dialog)
    };
    let dialog = built.wrap_err("failed to build the sample dialog")?;
    debug!(dialog = %dialog.id(), "sample dialog ready");

    let steps = script(&cli)?;
    surface
        .apply_script(steps)
        .map_err(|err| eyre!("{err:#}"))?;

    // Actions write the state directly; pull it back into the editors.
    dialog.reset_all(&mut surface);
    let report = dialog.validate(&mut surface);

    if cli.json {
        let snapshot = json!({
            "outline": surface.outline(),
            "elements": dialog.elements(&surface),
            "errors": report,
            "state": state.borrow().summary(),
        });
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print!("{}", surface.render());
        for (key, message) in &report.all {
            println!("error {key}: {message}");
        }
        println!("state: {}", state.borrow().summary());
    }

    if cli.close {
        dialog.close(&mut surface);
    }
    Ok(())
}

fn script(cli: &Cli) -> Result<Vec<ScriptStep>> {
    let mut steps = Vec::with_capacity(cli.sets.len() + cli.toggles.len() + cli.presses.len());
    for spec in &cli.sets {
        steps.push(ScriptStep::parse_set(spec).map_err(|err| eyre!("{err:#}"))?);
    }
    steps.extend(cli.toggles.iter().cloned().map(ScriptStep::Toggle));
    steps.extend(cli.presses.iter().cloned().map(ScriptStep::Press));
    Ok(steps)
}
