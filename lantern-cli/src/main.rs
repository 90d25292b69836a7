//! Lantern CLI
//!
//! Renders a page headlessly and dumps what each pipeline stage produced.

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Parser;
use lantern_browser::{Canvas, Tab, TabConfig};
use lantern_css::{DisplayCommand, FontDescriptor};
use lantern_html::print_tree;
use owo_colors::OwoColorize;

/// Lantern - a minimal browser engine
#[derive(Parser, Debug)]
#[command(name = "lantern")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Dump DOM, boxes and paint list of a file
    lantern ./index.html

    # Only the box tree, for a narrow viewport
    lantern --boxes --width 400 ./index.html

    # Paint list as JSON
    lantern --json --html '<p style="color: red">Hello world</p>'

    # What the second screen of a page draws
    lantern --draw --scroll 1 --url http://example.org/
"#)]
struct Cli {
    /// Path to an HTML file
    #[arg(value_name = "FILE", conflicts_with_all = ["html", "url"])]
    file: Option<PathBuf>,

    /// Render an HTML string instead of a file
    #[arg(long, value_name = "HTML", conflicts_with = "url")]
    html: Option<String>,

    /// Fetch and render a URL
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Viewport width in pixels
    #[arg(long, default_value_t = 800.0)]
    width: f32,

    /// Window height in pixels, browser chrome included
    #[arg(long, default_value_t = 600.0)]
    height: f32,

    /// Print the DOM tree
    #[arg(long)]
    dom: bool,

    /// Print the box tree with geometry
    #[arg(long)]
    boxes: bool,

    /// Print the paint command list
    #[arg(long)]
    paint: bool,

    /// Print the paint command list as JSON
    #[arg(long)]
    json: bool,

    /// Print the draw calls for the visible screen
    #[arg(long)]
    draw: bool,

    /// Scroll down this many steps before drawing
    #[arg(long, default_value_t = 0)]
    scroll: u32,

    /// Print page metrics after loading
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// With no section selected, show the three main dumps.
    const fn show_all(&self) -> bool {
        !(self.dom || self.boxes || self.paint || self.json || self.draw)
    }
}

/// Canvas that prints each draw call to stdout.
struct PrintCanvas;

impl Canvas for PrintCanvas {
    fn fill_rect(&mut self, left: f32, top: f32, right: f32, bottom: f32, color: &str) {
        println!("rect ({left:.1}, {top:.1})-({right:.1}, {bottom:.1}) {color}");
    }

    fn draw_text(&mut self, x: f32, y: f32, text: &str, font: &FontDescriptor, color: &str) {
        println!("text ({x:.1}, {y:.1}) {text:?} {font} {color}");
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = TabConfig {
        viewport_width: cli.width,
        viewport_height: cli.height,
        ..TabConfig::default()
    };
    let mut tab = Tab::new(config);

    if let Some(ref html) = cli.html {
        tab.load(html);
    } else if let Some(ref url) = cli.url {
        tab.load_url(url)?;
    } else if let Some(ref path) = cli.file {
        tab.load_url(&path.to_string_lossy())?;
    } else {
        bail!("nothing to render: pass a FILE, --html or --url (see --help)");
    }

    for _ in 0..cli.scroll {
        tab.scroll_down();
    }

    if cli.verbose {
        print_summary(&tab);
    }

    if cli.dom || cli.show_all() {
        heading("DOM Tree");
        print_tree(tab.dom(), tab.dom().root(), 0);
    }

    if cli.boxes || cli.show_all() {
        heading("Box Tree");
        print!("{}", tab.layout().stringify(tab.dom()));
    }

    if cli.paint || cli.show_all() {
        heading("Paint List");
        for command in tab.display_list().commands() {
            print_command(command);
        }
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(tab.display_list())?);
    }

    if cli.draw {
        heading(&format!("Screen (scroll {})", tab.scroll()));
        tab.draw(&mut PrintCanvas);
    }

    Ok(())
}

fn heading(title: &str) {
    println!("{}", format!("=== {title} ===").bold());
}

fn print_summary(tab: &Tab) {
    heading("Page");
    if let Some(url) = tab.url() {
        println!("{} {url}", "url:".dimmed());
    }
    println!(
        "{} {:.1} x {:.1}",
        "size:".dimmed(),
        tab.page_width(),
        tab.page_height()
    );
    println!("{} {}", "nodes:".dimmed(), tab.dom().len());
    println!("{} {}", "commands:".dimmed(), tab.display_list().len());
}

fn print_command(command: &DisplayCommand) {
    match command {
        DisplayCommand::Rect {
            left,
            top,
            right,
            bottom,
            color,
        } => println!(
            "{} ({left:.1}, {top:.1})-({right:.1}, {bottom:.1}) {color}",
            "Rect".cyan()
        ),
        DisplayCommand::Text {
            x,
            y,
            text,
            font,
            color,
            ..
        } => println!(
            "{} ({x:.1}, {y:.1}) {text:?} {font} {color}",
            "Text".green()
        ),
    }
}
