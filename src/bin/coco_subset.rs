use clap::{Parser, Subcommand};
use coco_subset::config::JobConfig;
use coco_subset::logging::setup_logger;
use coco_subset::{run_splits, verify_layout, FilterJob, SplitLayout};
use itertools::Itertools;
use std::path::PathBuf;
use std::process::exit;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON job file with classes, splits, strict_copy and annotation_file
    #[clap(long, global = true, env = "COCO_SUBSET_CONFIG")]
    config: Option<PathBuf>,

    /// More logs (-v debug, -vv trace). RUST_LOG overrides it.
    #[clap(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Filter a single COCO annotation file and copy its images
    Filter {
        /// Original annotation file
        #[clap(long)]
        input_json: PathBuf,
        /// Where to write the filtered annotations
        #[clap(long)]
        output_json: PathBuf,
        /// Directory holding the original images
        #[clap(long)]
        input_images: PathBuf,
        /// Directory receiving the kept images
        #[clap(long)]
        output_images: PathBuf,
        /// Class names to keep, comma separated
        #[clap(long, value_delimiter = ',')]
        classes: Vec<String>,
        /// Abort when an existing image cannot be copied
        #[clap(long)]
        strict_copy: bool,
    },
    /// Filter every split (train, valid, test) of a dataset directory
    Splits {
        /// Dataset root holding one directory per split
        #[clap(long)]
        input_root: PathBuf,
        /// Root of the filtered dataset
        #[clap(long)]
        output_root: PathBuf,
        /// Class names to keep, comma separated
        #[clap(long, value_delimiter = ',')]
        classes: Vec<String>,
        /// Splits to process, comma separated
        #[clap(long, value_delimiter = ',')]
        splits: Vec<String>,
        /// Abort when an existing image cannot be copied
        #[clap(long)]
        strict_copy: bool,
    },
    /// Check the splits of a filtered dataset
    Verify {
        /// Dataset root holding one directory per split
        #[clap(long)]
        root: PathBuf,
        /// Splits to check, comma separated
        #[clap(long, value_delimiter = ',')]
        splits: Vec<String>,
    },
}

fn main() {
    let args = Args::parse();
    setup_logger(args.verbose);
    if let Err(err) = run(args) {
        eprintln!("Error: {:?}", err);
        exit(1);
    }
}

fn run(args: Args) -> Result<(), anyhow::Error> {
    let file_config = match &args.config {
        Some(path) => JobConfig::from_file(path)?,
        None => JobConfig::default(),
    };
    match args.cmd {
        Command::Filter {
            input_json,
            output_json,
            input_images,
            output_images,
            classes,
            strict_copy,
        } => {
            let config = file_config.merge_cli(&classes, &[], strict_copy);
            config.validate()?;
            let job = FilterJob {
                input_json,
                output_json,
                input_image_dir: input_images,
                output_image_dir: output_images,
                target_classes: config.classes.clone(),
                copy_policy: config.copy_policy(),
            };
            let summary = job.run()?;
            println!("{}", summary);
        }
        Command::Splits {
            input_root,
            output_root,
            classes,
            splits,
            strict_copy,
        } => {
            let config = file_config.merge_cli(&classes, &splits, strict_copy);
            config.validate()?;
            let layout = SplitLayout {
                root: input_root,
                splits: config.splits.clone(),
                annotation_file: config.annotation_file.clone(),
            };
            let summaries = run_splits(
                &layout,
                &output_root,
                config.classes.as_slice(),
                config.copy_policy(),
            )?;
            for (split, summary) in summaries {
                println!("[{}]", split);
                println!("{}", summary);
            }
        }
        Command::Verify { root, splits } => {
            let config = file_config.merge_cli(&[], &splits, false);
            let layout = SplitLayout {
                root,
                splits: config.splits,
                annotation_file: config.annotation_file,
            };
            for report in verify_layout(&layout)? {
                println!(
                    "{}: {} classes, {} images, {} annotations",
                    report.split, report.categories, report.images, report.annotations
                );
                if !report.missing_files.is_empty() {
                    println!(
                        "  missing image files: {}",
                        report.missing_files.iter().join(", ")
                    );
                }
            }
        }
    }
    Ok(())
}
