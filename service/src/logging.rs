use crate::config::Config;
use log::{LevelFilter, SetLoggerError};
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

/// Modules to filter out from logging when not in Trace mode.
/// The HTTP stack logs every connection; a long-lived event stream makes that noisy.
const FILTERED_MODULES: &[&str] = &["tower", "tower_http", "hyper", "axum", "tokio_util"];

/// Terminal logger settings resolved from [`Config`].
#[derive(Debug, Clone, PartialEq)]
pub struct LogSettings {
    pub level: LevelFilter,
    pub filter_dependencies: bool,
    pub colored: bool,
}

impl LogSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            level: config.log_level_filter,
            // Trace shows everything, dependencies included
            filter_dependencies: config.log_level_filter != LevelFilter::Trace,
            colored: !config.is_production(),
        }
    }

    fn terminal_mode(&self) -> TerminalMode {
        if self.colored {
            TerminalMode::Mixed
        } else {
            TerminalMode::Stderr
        }
    }

    fn color_choice(&self) -> ColorChoice {
        if self.colored {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        }
    }

    fn build_log_config(&self) -> simplelog::Config {
        let mut builder = ConfigBuilder::new();
        builder.set_time_format_rfc3339();

        if self.filter_dependencies {
            for module in FILTERED_MODULES {
                builder.add_filter_ignore_str(module);
            }
        }

        builder.build()
    }
}

pub struct Logger {}

impl Logger {
    /// Installs the global terminal logger. Fails if a logger is already set.
    pub fn init_logger(config: &Config) -> Result<(), SetLoggerError> {
        let settings = LogSettings::from_config(config);

        TermLogger::init(
            settings.level,
            settings.build_log_config(),
            settings.terminal_mode(),
            settings.color_choice(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(args: &[&str]) -> Config {
        Config::from_args(std::iter::once("datastar_stream").chain(args.iter().copied()))
    }

    #[test]
    fn test_filtered_modules_cover_the_http_stack() {
        for module in ["tower", "tower_http", "hyper", "axum", "tokio_util"] {
            assert!(
                FILTERED_MODULES.contains(&module),
                "{module} should be filtered"
            );
        }
    }

    #[test]
    fn test_workspace_crates_are_never_filtered() {
        for module in ["events", "sse", "web", "datastar_stream"] {
            assert!(
                !FILTERED_MODULES.contains(&module),
                "{module} should not be filtered"
            );
        }
    }

    #[test]
    fn test_trace_level_disables_filtering() {
        let settings = LogSettings::from_config(&config(&["--log-level-filter", "TRACE"]));
        assert_eq!(settings.level, LevelFilter::Trace);
        assert!(!settings.filter_dependencies);
    }

    #[test]
    fn test_other_levels_enable_filtering() {
        for level in ["OFF", "ERROR", "WARN", "INFO", "DEBUG"] {
            let settings = LogSettings::from_config(&config(&["--log-level-filter", level]));
            assert!(
                settings.filter_dependencies,
                "{level} should enable filtering"
            );
        }
    }

    #[test]
    fn test_production_logs_plain_text_to_stderr() {
        let settings = LogSettings::from_config(&config(&["--runtime-env", "production"]));
        assert!(!settings.colored);
        assert!(matches!(settings.terminal_mode(), TerminalMode::Stderr));
        assert!(matches!(settings.color_choice(), ColorChoice::Never));
    }

    #[test]
    fn test_development_logs_in_color() {
        let settings = LogSettings::from_config(&config(&[]));
        assert!(settings.colored);
        assert!(matches!(settings.terminal_mode(), TerminalMode::Mixed));
    }

    #[test]
    fn test_build_log_config_does_not_panic() {
        let _filtered = LogSettings::from_config(&config(&[])).build_log_config();
        let _unfiltered =
            LogSettings::from_config(&config(&["--log-level-filter", "TRACE"])).build_log_config();
    }
}
