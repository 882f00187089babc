use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Write};

use yamlnav::commands::{format_matches, read_path, write_path, DocumentSelector};
use yamlnav::config::Config;
use yamlnav::document::emitter::emit_documents;
use yamlnav::document::parser::parse_value;
use yamlnav::document::tree::YamlTree;
use yamlnav::file::loader::{load_yaml_file, load_yaml_from_stdin};
use yamlnav::file::saver::save_yaml_file;

/// yamlnav - read and write YAML by path, through anchors and merge keys
#[derive(Parser)]
#[command(name = "yamlnav")]
#[command(version)]
#[command(about = "Read and write YAML documents by path", long_about = None)]
struct Cli {
    /// Log every navigation decision to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print every node a path designates
    Read {
        /// YAML file to read, or '-' for stdin
        file: String,

        /// Path expression, e.g. a.b[0].c (empty for the whole document)
        #[arg(default_value = "")]
        path: String,

        /// Document index, or '*' for every document
        #[arg(short, long, default_value = "0")]
        doc: DocumentSelector,

        /// Print matches as JSON
        #[arg(short, long)]
        json: bool,

        /// Treat aliases and merge keys as opaque
        #[arg(long)]
        no_aliases: bool,
    },
    /// Set the value at a path
    Write {
        /// YAML file to update, or '-' for stdin
        file: String,

        /// Path expression, e.g. a.b[+]
        path: String,

        /// New value, parsed as YAML (falls back to a plain string)
        value: String,

        /// Document index, or '*' for every document
        #[arg(short, long, default_value = "0")]
        doc: DocumentSelector,

        /// Update the file instead of printing the result
        #[arg(short, long)]
        inplace: bool,

        /// Do not create missing keys
        #[arg(long)]
        no_create: bool,

        /// Refuse writes that change a node's kind
        #[arg(long)]
        strict: bool,
    },
}

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn load(file: &str) -> Result<Vec<YamlTree>> {
    if file == "-" {
        load_yaml_from_stdin()
    } else {
        load_yaml_file(file)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load();
    let mut stdout = io::stdout().lock();

    match cli.command {
        Command::Read {
            file,
            path,
            doc,
            json,
            no_aliases,
        } => {
            // CLI flags override config
            config.output_json |= json;
            config.follow_aliases &= !no_aliases;

            let mut documents = load(&file)?;
            let results = read_path(&mut documents, &path, doc, &config)?;
            write!(stdout, "{}", format_matches(&documents, &results, &config)?)?;
        }
        Command::Write {
            file,
            path,
            value,
            doc,
            inplace,
            no_create,
            strict,
        } => {
            config.auto_create &= !no_create;
            config.strict_kinds |= strict;

            if inplace && file == "-" {
                bail!("Cannot update stdin in place");
            }

            let mut documents = load(&file)?;
            let value = parse_value(&value);
            let updated = write_path(&mut documents, &path, &value, doc, &config)?;
            log::info!("updated {} node(s)", updated);

            if inplace {
                save_yaml_file(&file, &documents, &config)?;
            } else {
                write!(stdout, "{}", emit_documents(&documents, config.indent_size))?;
            }
        }
    }

    stdout.flush()?;
    Ok(())
}
