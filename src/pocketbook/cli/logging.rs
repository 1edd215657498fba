use colored::*;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::{self, Writer};
use tracing_subscriber::fmt::FormatEvent;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "POCKETBOOK_LOG";

/// One line per event: a colored level marker, then the fields.
pub struct PocketFormatter;

impl<S, N> FormatEvent<S, N> for PocketFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> format::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let (symbol, color_func): (&str, fn(ColoredString) -> ColoredString) =
            match *event.metadata().level() {
                Level::TRACE => ("[ ]", |s| s.dimmed()),
                Level::DEBUG => ("[?]", |s| s.blue()),
                Level::INFO => ("[+]", |s| s.green()),
                Level::WARN => ("[*]", |s| s.yellow().bold()),
                Level::ERROR => ("[-]", |s| s.red().bold()),
            };

        write!(writer, "{} ", color_func(symbol.into()))?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn level_for(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Log to stderr. `POCKETBOOK_LOG` (an env-filter directive) overrides `-v`.
pub fn init(verbose: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(format!("pocketbook={}", level_for(verbose))));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .event_format(PocketFormatter)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(level_for(0), "warn");
        assert_eq!(level_for(1), "info");
        assert_eq!(level_for(2), "debug");
        assert_eq!(level_for(9), "trace");
    }
}
