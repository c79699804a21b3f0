use clap::{Args, Parser, Subcommand};

/// `Nova X` - personal assistant gateway and chat client.
#[derive(Parser, Debug)]
#[command(name = "novax")]
#[command(author = "theonlyhennygod")]
#[command(version = "0.1.0")]
#[command(about = "A friendly personal assistant.", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the gateway server
    Serve {
        /// Port to listen on (use 0 for random available port)
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Open an interactive chat session against a running gateway
    Chat {
        /// Gateway base URL (default from config)
        #[arg(long)]
        gateway: Option<String>,
    },

    /// Send a single message and print the reply
    Ask {
        /// The message to send
        message: String,

        /// Gateway base URL (default from config)
        #[arg(long)]
        gateway: Option<String>,
    },

    /// Fetch headlines by topic or country
    News(NewsArgs),

    /// Search the web and print the results
    Search {
        /// The search query
        query: String,

        /// Gateway base URL (default from config)
        #[arg(long)]
        gateway: Option<String>,
    },

    /// Extract the text of a local PDF via the gateway
    Pdf {
        /// Path to the PDF file
        path: String,

        /// Gateway base URL (default from config)
        #[arg(long)]
        gateway: Option<String>,
    },
}

#[derive(Args, Debug)]
pub struct NewsArgs {
    /// Headlines about a topic
    #[arg(long, conflicts_with = "country", required_unless_present = "country")]
    pub topic: Option<String>,

    /// Top headlines for a country (name, e.g. "india")
    #[arg(long)]
    pub country: Option<String>,

    /// Gateway base URL (default from config)
    #[arg(long)]
    pub gateway: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_defaults() {
        let cli = Cli::try_parse_from(["novax", "serve"]).unwrap();
        match cli.command {
            Commands::Serve { port, host } => {
                assert_eq!(port, 8080);
                assert_eq!(host, "127.0.0.1");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn ask_takes_a_message() {
        let cli = Cli::try_parse_from(["novax", "ask", "hello"]).unwrap();
        match cli.command {
            Commands::Ask { message, gateway } => {
                assert_eq!(message, "hello");
                assert!(gateway.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn news_requires_topic_or_country() {
        assert!(Cli::try_parse_from(["novax", "news"]).is_err());
        assert!(Cli::try_parse_from(["novax", "news", "--topic", "ai", "--country", "us"]).is_err());

        let cli = Cli::try_parse_from(["novax", "news", "--country", "india"]).unwrap();
        match cli.command {
            Commands::News(args) => assert_eq!(args.country.as_deref(), Some("india")),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn gateway_override_parses() {
        let cli = Cli::try_parse_from(["novax", "chat", "--gateway", "http://10.0.0.2:9000"])
            .unwrap();
        match cli.command {
            Commands::Chat { gateway } => {
                assert_eq!(gateway.as_deref(), Some("http://10.0.0.2:9000"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
