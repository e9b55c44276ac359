use std::error::Error;

use clap::Parser;

use dep_tree::{
    cli::args::{CliArgs, Command},
    DepTree,
};

fn run() -> Result<(), Box<dyn Error>> {
    let cli_args: CliArgs = CliArgs::parse();
    log::debug!("{:?}", cli_args);

    let builder = DepTree::builder().build_directory(&cli_args.build_directory);

    match cli_args.cmd {
        Command::Generate {
            model,
            output_file,
            include_all_build_files,
            include_included_builds,
            curation_audit_mode,
            jobs,
        } => {
            // Flags only switch features on; otherwise the environment decides
            let mut builder = builder.output_file(output_file);
            if include_all_build_files {
                builder = builder.include_all_build_files(true);
            }
            if include_included_builds {
                builder = builder.include_included_builds(true);
            }
            if curation_audit_mode {
                builder = builder.curation_audit_mode(true);
            }
            if let Some(jobs) = jobs {
                builder = builder.jobs(jobs);
            }

            let files = builder.try_build()?.generate(model)?;
            log::info!("Generated {} dependency graph(s)", files.len());
            Ok(())
        }
        Command::Clean { output_file } => {
            let builder = match output_file {
                Some(output_file) => builder.output_file(output_file),
                None => builder,
            };
            builder.try_build()?.clean()
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
