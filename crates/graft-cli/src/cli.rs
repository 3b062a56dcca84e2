use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "graft",
    about = "Graft: glue partial linear maps that agree on their common domain",
    version
)]
pub struct Cli {
    /// Configuration file; defaults apply when it does not exist
    #[arg(long, global = true, default_value = "graft.toml")]
    pub config: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Join two partial maps that agree on their common domain
    Join {
        /// Left map JSON path
        left: String,

        /// Right map JSON path
        right: String,

        /// Decomposition strategy: left_first or right_first
        #[arg(long)]
        strategy: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Greatest common restriction of two partial maps
    Meet {
        /// Left map JSON path
        left: String,

        /// Right map JSON path
        right: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Decide whether RIGHT extends LEFT
    Le {
        /// Left map JSON path
        left: String,

        /// Right map JSON path
        right: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Encode a partial map as its graph in E × F
    Graph {
        /// Map JSON path
        map: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Decode a graph back into a partial map
    Decode {
        /// Graph JSON path
        graph: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Glue a directed family (or an ascending chain) of partial maps
    Colimit {
        /// Member map JSON paths
        #[arg(required = true)]
        maps: Vec<String>,

        /// Treat the members as an ascending chain, in the given order
        #[arg(long)]
        chain: bool,

        /// Chain lookup: binary or linear
        #[arg(long)]
        search: Option<String>,

        /// Evaluate the colimit at this vector instead of materializing it
        #[arg(long)]
        eval: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Extend a partial map by one vector outside its domain
    Extend {
        /// Map JSON path
        map: String,

        /// Direction, comma-separated scalars (e.g. 1,0,2/3)
        #[arg(long)]
        x: String,

        /// Image of the direction, comma-separated scalars
        #[arg(long)]
        y: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Extend a partial map by zero to a total map
    Complete {
        /// Map JSON path
        map: String,

        /// Evaluate lazily at this vector instead of building the total map
        #[arg(long)]
        eval: Option<String>,

        /// Steps probed by lazy evaluation
        #[arg(long)]
        probe_depth: Option<usize>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run a law check fixture
    Check {
        /// Fixture JSON path (a check object, or a case with a `check` field)
        case: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
