#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::too_many_lines,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    clippy::cast_lossless
)]

mod procedural;

use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use clap::{Parser, ValueEnum};
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, Naming};
use icy_gallery::{
    AspectPolicy, DataFlags, Gallery, GalleryKey, GalleryOptions, GlyphType, MenuAction, MenuEntry, MenuItem, Modifiers, Point, RgbaSurface,
    Size, ThumbStatus,
};

const APP_NAME: &str = "icy_gallery";

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum AspectArg {
    Fit,
    Fill,
    Stretch,
}

impl From<AspectArg> for AspectPolicy {
    fn from(arg: AspectArg) -> Self {
        match arg {
            AspectArg::Fit => AspectPolicy::Fit,
            AspectArg::Fill => AspectPolicy::Fill,
            AspectArg::Stretch => AspectPolicy::Stretch,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ModifierArg {
    Shift,
    Ctrl,
    Alt,
    Logo,
}

#[derive(Parser, Debug)]
#[command(version, about = "Renders a thumbnail gallery with a scripted pointer gesture to a PNG file")]
pub struct Args {
    #[arg(help = "Number of items", long, default_value_t = 400)]
    count: usize,

    #[arg(help = "Viewport width", long, default_value_t = 800)]
    width: i32,

    #[arg(help = "Viewport height", long, default_value_t = 600)]
    height: i32,

    #[arg(help = "Zoom step (0 = smallest tiles)", long)]
    zoom: Option<usize>,

    #[arg(help = "How thumbnails are fit into tiles", long, value_enum)]
    aspect: Option<AspectArg>,

    #[arg(help = "Seed for the procedural thumbnails", long, default_value_t = 1)]
    seed: u64,

    #[arg(help = "Image files used for the first items", long, num_args = 1..)]
    images: Vec<PathBuf>,

    #[arg(help = "Marquee drag in viewport pixels", long, num_args = 4, value_names = ["X0", "Y0", "X1", "Y1"], allow_negative_numbers = true)]
    drag: Option<Vec<i32>>,

    #[arg(help = "Modifiers held during the drag", long, value_enum, value_delimiter = ',')]
    modifiers: Vec<ModifierArg>,

    #[arg(help = "Keys sent after the drag: 1/2/3 aspect, +/- zoom, a select all, i invert", long)]
    keys: Option<String>,

    #[arg(help = "Reject selections with more items than this", long)]
    max_selection: Option<usize>,

    #[arg(help = "Gallery options file (TOML)", long)]
    options: Option<PathBuf>,

    #[arg(help = "Write the effective options back to the options file", long, default_value_t = false)]
    save_options: bool,

    #[arg(help = "Output PNG", long, default_value = "gallery.png")]
    output: PathBuf,
}

fn get_log_dir() -> Option<PathBuf> {
    if let Some(proj_dirs) = directories::ProjectDirs::from("com", "GitHub", APP_NAME) {
        let dir = proj_dirs.config_dir().to_path_buf();
        if !dir.exists() {
            std::fs::create_dir_all(&dir).ok()?;
        }
        return Some(dir);
    }
    None
}

fn default_options_file() -> Option<PathBuf> {
    get_log_dir().map(|dir| dir.join("gallery.toml"))
}

fn start_logger() -> Option<flexi_logger::LoggerHandle> {
    let logger = Logger::try_with_env_or_str("info").ok()?;
    let handle = if let Some(log_dir) = get_log_dir() {
        logger
            .log_to_file(FileSpec::default().directory(&log_dir).basename(APP_NAME).suffix("log").suppress_timestamp())
            .rotate(Criterion::Size(64 * 1024), Naming::Numbers, Cleanup::KeepLogFiles(3))
            .duplicate_to_stderr(flexi_logger::Duplicate::Warn)
            .start()
    } else {
        eprintln!("Failed to create log file");
        logger.log_to_stderr().start()
    };
    handle.ok()
}

fn modifiers(args: &[ModifierArg]) -> Modifiers {
    args.iter().fold(Modifiers::empty(), |mods, m| {
        mods | match m {
            ModifierArg::Shift => Modifiers::SHIFT,
            ModifierArg::Ctrl => Modifiers::CTRL,
            ModifierArg::Alt => Modifiers::ALT,
            ModifierArg::Logo => Modifiers::LOGO,
        }
    })
}

fn populate(gallery: &mut Gallery, args: &Args) {
    let mut rng = fastrand::Rng::with_seed(args.seed);
    let glyphs = gallery.glyph_cache();
    let edge = 256;

    for i in 0..args.count {
        if let Some(path) = args.images.get(i) {
            let name = path.file_name().map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().to_string());
            match image::open(path) {
                Ok(img) => {
                    gallery.add(name, Some(img.to_rgba8()), None);
                }
                Err(err) => {
                    log::warn!("Error loading image {}: {err}", path.display());
                    let index = gallery.add(name, None, None);
                    gallery.set_status(index, ThumbStatus::Error);
                }
            }
            continue;
        }

        let n = i + 1;
        let name = format!("Item {n}");
        let status = if n % 97 == 0 {
            ThumbStatus::Error
        } else if n % 53 == 0 {
            ThumbStatus::Missing
        } else if n % 37 == 0 {
            ThumbStatus::Placeholder
        } else {
            ThumbStatus::Ok
        };

        let index = if status == ThumbStatus::Ok {
            let thumb = procedural::random_thumb(edge, &mut rng);
            let thumb = match n % 23 {
                0 => procedural::thumb_with_glyph(&thumb, &glyphs, GlyphType::StatusWarn),
                11 => procedural::thumb_with_glyph(&thumb, &glyphs, GlyphType::StatusOk),
                _ => thumb,
            };
            gallery.add(name, Some(thumb), None)
        } else {
            gallery.add(name, None, None)
        };
        gallery.set_status(index, status);
        if n % 7 == 0 {
            gallery.set_data_flags(index, DataFlags::META_MISSING);
        }
    }
    log::info!("{} items added", gallery.len());
}

fn install_hooks(gallery: &mut Gallery, args: &Args) -> Rc<Cell<AspectPolicy>> {
    if let Some(max) = args.max_selection {
        gallery.set_selection_veto(move |candidate| {
            let ok = candidate.len() <= max;
            if !ok {
                log::info!("Rejecting selection of {} items (max {max})", candidate.len());
            }
            ok
        });
    }

    let aspect = Rc::new(Cell::new(gallery.aspect()));
    let current = aspect.clone();
    gallery.set_context_menu_hook(move |menu| {
        menu.separator();
        for policy in AspectPolicy::ALL {
            menu.add(MenuEntry::new(format!("Aspect: {}", policy.name()), MenuAction::SetAspect(policy)).checked(current.get() == policy));
        }
    });
    aspect
}

fn send_keys(gallery: &mut Gallery, keys: &str, aspect: &Cell<AspectPolicy>) {
    for ch in keys.chars() {
        let handled = match ch {
            '1' | '2' | '3' => {
                let policy = AspectPolicy::ALL[(ch as usize) - ('1' as usize)];
                gallery.set_aspect(policy);
                aspect.set(policy);
                true
            }
            '+' => gallery.key_down(GalleryKey::Plus, Modifiers::CTRL),
            '-' => gallery.key_down(GalleryKey::Minus, Modifiers::CTRL),
            'a' => gallery.key_down(GalleryKey::Char('a'), Modifiers::CTRL),
            'i' => gallery.execute(MenuAction::InvertSelection),
            'j' => gallery.key_down(GalleryKey::Down, Modifiers::empty()),
            'k' => gallery.key_down(GalleryKey::Up, Modifiers::empty()),
            _ => false,
        };
        if !handled {
            log::warn!("Key '{ch}' not handled");
        }
    }
}

/// Replays a press, a few intermediate moves and the release
fn simulate_drag(gallery: &mut Gallery, from: Point, to: Point, mods: Modifiers) {
    const STEPS: i32 = 8;
    log::info!("Dragging from {from} to {to} with {mods:?}");
    gallery.pointer_down(from, mods);
    for step in 1..=STEPS {
        let p = Point::new(from.x + (to.x - from.x) * step / STEPS, from.y + (to.y - from.y) * step / STEPS);
        gallery.pointer_move(p, mods, true);
    }
    gallery.pointer_up(to, mods);
}

fn log_messages(gallery: &mut Gallery) {
    for msg in gallery.take_messages() {
        log::info!("  {msg:?}");
    }
}

fn log_menu(gallery: &mut Gallery, p: Point) {
    let menu = gallery.right_click(p);
    log::info!("Context menu for {:?}:", menu.target());
    for item in menu.items() {
        match item {
            MenuItem::Entry(entry) => {
                let check = match entry.checked {
                    Some(true) => "(x) ",
                    Some(false) => "( ) ",
                    None => "",
                };
                let state = if entry.enabled { "" } else { " [disabled]" };
                log::info!("  {check}{}{state}", entry.label);
            }
            MenuItem::Separator => log::info!("  ----"),
        }
    }
}

fn load_options(args: &Args) -> (GalleryOptions, Option<PathBuf>) {
    let path = args.options.clone().or_else(default_options_file);
    let mut options = path.as_deref().map_or_else(GalleryOptions::default, GalleryOptions::load_or_default);
    if let Some(zoom) = args.zoom {
        options.zoom_index = zoom;
    }
    if let Some(aspect) = args.aspect {
        options.aspect = aspect.into();
    }
    (options.sanitized(), path)
}

fn save_options(options: &GalleryOptions, path: &Path) -> anyhow::Result<()> {
    options.store_to(path)?;
    log::info!("Options written to {}", path.display());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _logger = start_logger();

    log::info!("Starting {APP_NAME} demo {}", env!("CARGO_PKG_VERSION"));

    let (options, options_path) = load_options(&args);
    let mut gallery = Gallery::with_options(&options);
    gallery.set_viewport_size(Size::new(args.width, args.height));
    populate(&mut gallery, &args);
    let aspect = install_hooks(&mut gallery, &args);
    gallery.take_messages();

    if let Some(drag) = &args.drag {
        let from = Point::new(drag[0], drag[1]);
        let to = Point::new(drag[2], drag[3]);
        simulate_drag(&mut gallery, from, to, modifiers(&args.modifiers));
        log_messages(&mut gallery);
        log_menu(&mut gallery, to);
    }

    if let Some(keys) = &args.keys {
        send_keys(&mut gallery, keys, &aspect);
        log_messages(&mut gallery);
    }

    log::info!("Selection: {:?}", gallery.selection());

    let mut surface = RgbaSurface::new(args.width, args.height)?;
    gallery.paint(&mut surface);
    log::info!("{} labels painted", surface.labels().len());
    surface.save_png(&args.output)?;
    log::info!("Wrote {}", args.output.display());

    if args.save_options {
        match options_path {
            Some(path) => save_options(gallery.options(), &path)?,
            None => log::warn!("No options file location available"),
        }
    }

    log::info!("Shutting down.");
    Ok(())
}
