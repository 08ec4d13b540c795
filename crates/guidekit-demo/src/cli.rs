#![forbid(unsafe_code)]

//! Command-line argument parsing for the demo.
//!
//! Parses args manually to keep the binary lean. Supports environment
//! variable overrides via the `GUIDEKIT_DEMO_*` prefix; explicit flags win.

use std::env;

use guidekit::Size;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const HELP_TEXT: &str = "\
GuideKit Demo: a scripted three-step tour, rendered headlessly

USAGE:
    guidekit-demo [OPTIONS]

OPTIONS:
    --frames=N           Display refreshes between interactions (default: 2)
    --layout-delay=N     Frames before the first target is laid out (default: 3)
    --viewport=WxH       Canvas size (default: 390x844)
    --quiet, -q          Print outcomes only, not draw operations
    --help, -h           Show this help message
    --version, -V        Show version

ENVIRONMENT VARIABLES:
    GUIDEKIT_DEMO_FRAMES         Override --frames
    GUIDEKIT_DEMO_LAYOUT_DELAY   Override --layout-delay
    GUIDEKIT_DEMO_VIEWPORT       Override --viewport
    GUIDEKIT_HIGHLIGHT_PADDING   Highlight padding around targets
    GUIDEKIT_CORNER_RADIUS       Corner radius of the highlight hole
    GUIDEKIT_MASK_OPACITY        Opacity of the dim layer
    GUIDEKIT_MASK_COLOR          Colour of the dim layer (#rrggbb)
    GUIDEKIT_MAX_UNMEASURED_FRAMES  Give up measuring after N frames
    RUST_LOG                     Log filter (default: warn)";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq)]
pub struct Opts {
    /// Frames advanced between interactions.
    pub frames: usize,
    /// Frames before the first target reports a complete rectangle.
    pub layout_delay: u64,
    pub viewport: Size,
    /// Suppress the draw-operation listing.
    pub quiet: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            frames: 2,
            layout_delay: 3,
            viewport: Size::new(390.0, 844.0),
            quiet: false,
        }
    }
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run(Opts),
    Help,
    Version,
}

/// Parse `WxH` into a size.
pub fn parse_viewport(s: &str) -> Option<Size> {
    let (w, h) = s.split_once(['x', 'X'])?;
    let w: f64 = w.trim().parse().ok()?;
    let h: f64 = h.trim().parse().ok()?;
    (w > 0.0 && h > 0.0 && w.is_finite() && h.is_finite()).then(|| Size::new(w, h))
}

impl Opts {
    /// Parse the process arguments and environment.
    pub fn parse() -> Result<Command, String> {
        Self::parse_from(env::args().skip(1), |name| env::var(name).ok())
    }

    /// Parse `args` with `lookup` standing in for the environment.
    ///
    /// Environment variables take precedence over defaults but are overridden
    /// by explicit command-line flags. Unparseable environment values are
    /// ignored; unparseable flags are errors.
    pub fn parse_from<I, F>(args: I, lookup: F) -> Result<Command, String>
    where
        I: IntoIterator<Item = String>,
        F: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();

        if let Some(val) = lookup("GUIDEKIT_DEMO_FRAMES")
            && let Ok(n) = val.trim().parse()
        {
            opts.frames = n;
        }
        if let Some(val) = lookup("GUIDEKIT_DEMO_LAYOUT_DELAY")
            && let Ok(n) = val.trim().parse()
        {
            opts.layout_delay = n;
        }
        if let Some(val) = lookup("GUIDEKIT_DEMO_VIEWPORT")
            && let Some(size) = parse_viewport(&val)
        {
            opts.viewport = size;
        }

        for arg in args {
            match arg.as_str() {
                "--help" | "-h" => return Ok(Command::Help),
                "--version" | "-V" => return Ok(Command::Version),
                "--quiet" | "-q" => opts.quiet = true,
                other => {
                    if let Some(val) = other.strip_prefix("--frames=") {
                        opts.frames = val
                            .parse()
                            .map_err(|_| format!("Invalid --frames value: {val}"))?;
                    } else if let Some(val) = other.strip_prefix("--layout-delay=") {
                        opts.layout_delay = val
                            .parse()
                            .map_err(|_| format!("Invalid --layout-delay value: {val}"))?;
                    } else if let Some(val) = other.strip_prefix("--viewport=") {
                        opts.viewport =
                            parse_viewport(val).ok_or_else(|| format!("Invalid --viewport value: {val}"))?;
                    } else {
                        return Err(format!(
                            "Unknown argument: {other}\nRun with --help for usage information."
                        ));
                    }
                }
            }
        }

        Ok(Command::Run(opts))
    }
}
