use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use upnpav_api::{BrowseConfig, ContentDirectoryService, SoapClient, SoapConfig};

mod logging;
mod output;

use logging::{init_logging, LoggingMode};

/// UPnP ContentDirectory explorer
///
/// Browses and searches a media server given its ContentDirectory control
/// URL (as found in the server's device description).
#[derive(Parser, Debug)]
#[command(name = "upexplo")]
#[command(version)]
struct Args {
    /// ContentDirectory control URL, e.g. http://192.168.1.5:49152/ctl/ContentDir
    #[arg(short = 'u', long, env = "UPEXPLO_CONTROL_URL")]
    control_url: String,

    /// Entries requested per Browse/Search call
    #[arg(long, default_value = "100")]
    page_size: u32,

    /// Request timeout in seconds
    #[arg(short = 't', long, default_value = "10")]
    timeout: u64,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the children of a container (root is "0")
    Readdir { object_id: String },
    /// Show the metadata of one object
    Metadata { object_id: String },
    /// Search the whole server
    Search {
        criteria: String,
        /// Container to search below
        #[arg(long, default_value = "0")]
        container: String,
    },
    /// Show the server's search capabilities
    Caps,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(LoggingMode::from_verbosity(args.verbose))?;
    debug!(?args, "starting");

    let soap = SoapClient::with_config(&SoapConfig {
        read_timeout: Duration::from_secs(args.timeout),
        ..SoapConfig::interactive()
    });
    let server = ContentDirectoryService::with_config(
        soap,
        args.control_url.as_str(),
        BrowseConfig::new().with_page_size(args.page_size),
    );

    match &args.command {
        Command::Readdir { object_id } => {
            println!("readdir: [{}]", object_id);
            let content = server
                .read_dir(object_id)
                .with_context(|| format!("readdir {} failed", object_id))?;
            print_content(&args, "Browse", &content)?;
        }
        Command::Metadata { object_id } => {
            println!("getMeta: [{}]", object_id);
            let content = server
                .get_metadata(object_id)
                .with_context(|| format!("metadata {} failed", object_id))?;
            print_content(&args, "getMeta", &content)?;
        }
        Command::Search { criteria, container } => {
            println!("search: [{}] in [{}]", criteria, container);
            let content = server
                .search(container, criteria)
                .with_context(|| format!("search {:?} failed", criteria))?;
            print_content(&args, "Search", &content)?;
        }
        Command::Caps => {
            let caps = server
                .get_search_capabilities()
                .context("getSearchCapabilities failed")?;
            println!("{}", output::render_capabilities(&caps));
        }
    }

    Ok(())
}

fn print_content(args: &Args, label: &str, content: &upnpav_api::DirContent) -> Result<()> {
    if args.json {
        println!("{}", output::content_json(content)?);
    } else {
        print!("{}", output::render_content(label, content));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&["upexplo", "-u", "http://h/cd", "readdir", "0"])]
    #[case(&["upexplo", "--control-url", "http://h/cd", "metadata", "1$4"])]
    #[case(&["upexplo", "-u", "http://h/cd", "search", "dc:title contains \"x\"", "--container", "1"])]
    #[case(&["upexplo", "-u", "http://h/cd", "-vv", "caps"])]
    fn test_command_lines_parse(#[case] argv: &[&str]) {
        assert!(Args::try_parse_from(argv).is_ok());
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Args::try_parse_from(["upexplo", "-u", "http://h/cd"]).is_err());
    }

    #[test]
    fn test_search_defaults_to_root() {
        let args = Args::try_parse_from(["upexplo", "-u", "x", "search", "q"]).unwrap();
        match args.command {
            Command::Search { container, .. } => assert_eq!(container, "0"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
