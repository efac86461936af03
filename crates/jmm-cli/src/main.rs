mod cli;

use clap::Parser as _;

use jmm_compiler::Compiler;

fn main() {
    let args = cli::Cli::parse();

    let source = match std::fs::read_to_string(&args.source) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    };
    let file_name = args
        .source
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.source.display().to_string());

    let mut compiler = match Compiler::parse(&source, &file_name) {
        Ok(compiler) => compiler,
        Err(_) => {
            eprintln!("Parse failed!!");
            std::process::exit(1);
        }
    };

    print!("{}", compiler.dump());

    let diagnostics = compiler.analyze();
    if !diagnostics.is_empty() {
        for diagnostic in &diagnostics {
            eprintln!("{diagnostic}");
        }
        eprintln!("{} error(s) found. Exiting.", diagnostics.len());
        std::process::exit(1);
    }

    let asm = compiler.generate();
    if let Err(err) = std::fs::write("output.asm", &asm) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
