//! Command-line parsing tests

#[cfg(test)]
mod cli_tests {
    use crate::{display_name, Args};
    use clap::Parser;
    use proptest::prelude::*;
    use std::path::{Path, PathBuf};

    #[test]
    fn test_files_are_required() {
        assert!(Args::try_parse_from(["sheetcheck"]).is_err());
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["sheetcheck", "6-S8.pdf", "6-S9.pdf"]).unwrap();
        assert_eq!(
            args.files,
            vec![PathBuf::from("6-S8.pdf"), PathBuf::from("6-S9.pdf")]
        );
        assert!(!args.json);
        assert!(!args.verbose);

        let config = args.load_config().unwrap();
        assert_eq!(config.limits.timeout_ms, 30_000);
        assert_eq!(config.limits.max_pages, 20);
    }

    #[test]
    fn test_limit_overrides() {
        let args = Args::try_parse_from([
            "sheetcheck",
            "--timeout-ms",
            "5000",
            "--max-pages",
            "3",
            "--json",
            "-t",
            "vivienda.toml",
            "sheet.pdf",
        ])
        .unwrap();
        assert!(args.json);
        assert_eq!(args.template, Some(PathBuf::from("vivienda.toml")));

        let config = args.load_config().unwrap();
        assert_eq!(config.limits.timeout_ms, 5000);
        assert_eq!(config.limits.max_pages, 3);
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let args =
            Args::try_parse_from(["sheetcheck", "-c", "/nonexistent/sheetcheck.toml", "a.pdf"])
                .unwrap();
        let err = args.load_config().unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_display_name_uses_file_name() {
        assert_eq!(display_name(Path::new("/entregas/2024/6-S8.pdf")), "6-S8.pdf");
        assert_eq!(display_name(Path::new("6-S8.pdf")), "6-S8.pdf");
    }

    proptest! {
        /// Property: any positive timeout given on the command line reaches the config
        #[test]
        fn timeout_override_roundtrips(timeout in 1u64..600_000) {
            let timeout_arg = timeout.to_string();
            let args =
                Args::try_parse_from(["sheetcheck", "--timeout-ms", timeout_arg.as_str(), "a.pdf"])
                    .unwrap();
            prop_assert_eq!(args.load_config().unwrap().limits.timeout_ms, timeout);
        }
    }
}
