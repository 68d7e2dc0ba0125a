use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about = "Hotel feedback taxonomy tools", long_about = None)]
pub struct Args {
    /// Data directory (config, taxonomy, embeddings).
    /// Defaults to $TAXO_BASE_PATH or ~/.local/share/taxo
    #[clap(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ProviderArgs {
    /// Embedding API key. Falls back to $OPENAI_API_KEY
    #[clap(long)]
    pub api_key: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the text a label is embedded as
    Enrich {
        label: String,

        /// Treat the label as a problem
        #[clap(long, default_value = "false")]
        problem: bool,
    },
    /// Expand a guest comment with domain vocabulary
    Expand { text: String },
    /// Check that a keyword belongs to a department
    Validate { label: String, department: String },
    /// Classify a guest comment against the stored embeddings
    Classify {
        text: String,

        /// Only keep keywords of this department
        #[clap(short, long)]
        department: Option<String>,

        /// Record LABEL as the accepted keyword
        #[clap(long, value_name = "LABEL")]
        confirm: Option<String>,

        #[clap(flatten)]
        provider: ProviderArgs,
    },
    /// Generate embeddings for the whole taxonomy
    Generate {
        /// Regenerate even if embeddings exist
        #[clap(short, long, default_value = "false")]
        force: bool,

        #[clap(flatten)]
        provider: ProviderArgs,
    },
    /// Load a taxonomy file ({keywords, problems, departments} JSON).
    /// Without a file, the built-in taxonomy is loaded
    Import { file: Option<PathBuf> },
    /// Whether stored embeddings match the taxonomy
    Status {},
    /// Mapping and reranking statistics
    Stats {},
}
