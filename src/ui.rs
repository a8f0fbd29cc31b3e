// UI layer: an interactive menu built on `dialoguer`, an `indicatif`
// spinner while the request runs, and `crossterm` colors for the banner
// and alerts.

use crate::api::Colorize;
use crate::app::{App, Notify};
use crate::media;
use crate::session::{Completion, Phase, SelectedFile, Session};
use anyhow::{bail, Context, Result};
use crossterm::style::Stylize;
use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Shows alerts in red and waits for Enter before returning.
#[derive(Default)]
pub struct TerminalNotifier {
    spinner: RefCell<Option<ProgressBar>>,
}

impl TerminalNotifier {
    /// Register the spinner that is on screen while a request runs, so an
    /// alert can clear it before printing.
    fn attach(&self, spinner: ProgressBar) {
        *self.spinner.borrow_mut() = Some(spinner);
    }

    fn detach(&self) {
        if let Some(spinner) = self.spinner.borrow_mut().take() {
            spinner.finish_and_clear();
        }
    }
}

impl Notify for TerminalNotifier {
    fn alert(&self, message: &str) {
        self.detach();
        println!("\n{}\n", message.red().bold());
        // Blocking: the user acknowledges before the menu comes back.
        if let Err(e) = Input::<String>::new()
            .with_prompt("Press Enter to continue")
            .allow_empty(true)
            .interact_text()
        {
            log::debug!("alert acknowledgement prompt failed: {}", e);
        }
    }
}

#[derive(Clone, Copy)]
enum Action {
    SelectImage,
    Colorize,
    ShowDataUri,
    HowItWorks,
    Exit,
}

/// Main interactive menu. Runs until the user chooses "Exit".
pub fn main_menu<C: Colorize>(mut app: App<C, TerminalNotifier>, output_dir: &Path) -> Result<()> {
    print_banner();
    loop {
        print_status(app.session());

        let actions = menu_for(app.session());
        let labels: Vec<&str> = actions.iter().map(|(label, _)| label.as_str()).collect();
        let selection = Select::new().items(&labels).default(0).interact()?;

        match actions[selection].1 {
            Action::SelectImage => select_image(&mut app, pick_image()),
            Action::Colorize => {
                if !app.session().can_colorize() {
                    println!("{}", "Select an image first.".dark_grey());
                    continue;
                }
                if run_colorization(&mut app)? == Some(Completion::Colorized) {
                    if let Some(path) = report("Could not save result", save_result(app.session(), output_dir)) {
                        println!("Colorized result saved to {}", path.display().to_string().green());
                    }
                }
            }
            Action::ShowDataUri => {
                if let Some(result) = app.session().result() {
                    println!("{}", result.data_uri());
                }
            }
            Action::HowItWorks => print_how_it_works(),
            Action::Exit => break,
        }
    }
    Ok(())
}

fn menu_for(session: &Session) -> Vec<(String, Action)> {
    let mut items = vec![("Upload B&W photo".to_string(), Action::SelectImage)];
    let colorize_label = if session.is_busy() {
        "Processing...".to_string()
    } else if session.can_colorize() {
        "Start colorization".to_string()
    } else {
        "Start colorization (disabled: no image selected)".to_string()
    };
    items.push((colorize_label, Action::Colorize));
    if session.result().is_some() {
        items.push(("Print result as data URI".to_string(), Action::ShowDataUri));
    }
    items.push(("How it works".to_string(), Action::HowItWorks));
    items.push(("Exit".to_string(), Action::Exit));
    items
}

/// Terminal stand-in for the browser file picker: only existing image
/// files are accepted.
fn pick_image() -> Result<SelectedFile> {
    let path: String = Input::new()
        .with_prompt("Image file path (JPG or PNG supported)")
        .validate_with(|input: &String| -> Result<(), &'static str> {
            let p = Path::new(input.trim());
            if !p.is_file() {
                Err("No such file")
            } else if !media::is_image_path(p) {
                Err("Not an image file")
            } else {
                Ok(())
            }
        })
        .interact_text()?;
    load_image(Path::new(path.trim()))
}

fn load_image(path: &Path) -> Result<SelectedFile> {
    SelectedFile::from_path(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Store a picked file. A file that could not be read is reported and the
/// previous selection stays in place.
fn select_image<C: Colorize, N: Notify>(app: &mut App<C, N>, picked: Result<SelectedFile>) {
    if let Some(file) = report("Could not load image", picked) {
        app.select_file(file);
    }
}

/// Print a failed action and keep the menu running.
fn report<T>(what: &str, outcome: Result<T>) -> Option<T> {
    match outcome {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("{}: {:#}", what, e);
            println!("{} {:#}", format!("{}:", what).red(), e);
            None
        }
    }
}

fn run_colorization<C: Colorize>(app: &mut App<C, TerminalNotifier>) -> Result<Option<Completion>> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message("RUNNING NEURAL NET...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    app.notifier().attach(spinner);

    let completion = app.start_colorization();
    app.notifier().detach();
    Ok(completion)
}

/// Write the current result next to the other outputs as
/// `<input-stem>-colorized.<ext>`.
fn save_result(session: &Session, output_dir: &Path) -> Result<PathBuf> {
    let (Some(file), Some(result)) = (session.file(), session.result()) else {
        bail!("No colorized result to save");
    };
    let stem = format!("{}-colorized", file.stem());
    result
        .save_into(output_dir, &stem)
        .with_context(|| format!("Failed to save result into {}", output_dir.display()))
}

fn print_status(session: &Session) {
    let phase = match session.phase() {
        Phase::Idle => "no image".dark_grey(),
        Phase::Ready => "ready".cyan(),
        Phase::Loading => "processing".yellow(),
        Phase::Done => "done".green(),
    };
    println!();
    println!("Status:  {}", phase);
    match session.preview() {
        Some(preview) => println!("Input:   {}", preview),
        None => println!("Input:   {}", "upload a black & white photo".dark_grey()),
    }
    match session.result() {
        Some(result) => println!("Result:  {}", result),
        None => println!("Result:  {}", "colorized result will appear here".dark_grey()),
    }
}

fn print_banner() {
    println!("{}{}", "Pixel".white().bold(), "Revive".magenta().bold());
    println!("{}", "Bring history to life.".dark_grey());
}

/// The static three-panel explainer.
pub fn print_how_it_works() {
    for (title, body) in HOW_IT_WORKS {
        println!();
        println!("{}", title.bold());
        println!("  {}", body);
    }
}

const HOW_IT_WORKS: [(&str, &str); 3] = [
    (
        "1. Analysis",
        "The AI scans the image in the LAB color space, separating Lightness (L) from Color (A/B).",
    ),
    (
        "2. Hallucination",
        "Using 1M+ training images, the model predicts the most probable colors for each texture (grass=green, sky=blue).",
    ),
    (
        "3. Reconstruction",
        "It merges the original sharp Lightness channel with the new colors to preserve 100% of the detail.",
    ),
];
