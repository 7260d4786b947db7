use clap::Parser;
use htmlgo_convert::{builder_to_html, ConvertError, Converter, ReverseError, DEFAULT_PACKAGE_PREFIX};
use std::fs;
use std::io::{self, Read};
use std::process;

/// Convert HTML files to htmlgo builder code, or builder code back to HTML.
#[derive(Parser, Debug)]
#[command(name = "htmlgo-convert", version)]
struct Args {
    /// Package qualifier for generated calls; empty for none
    #[arg(long, default_value = DEFAULT_PACKAGE_PREFIX)]
    prefix: String,

    /// Read builder code and print HTML instead
    #[arg(long)]
    reverse: bool,

    /// Input files, `-` for stdin
    #[arg(default_value = "-")]
    files: Vec<String>,
}

fn main() {
    let args = Args::parse();
    let converter = Converter::with_package_prefix(args.prefix.clone());
    let mut exit_code = 0;

    for file_path in &args.files {
        let content = match read_input(file_path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("✗ {}: failed to read input: {}", file_path, e);
                exit_code = 1;
                continue;
            }
        };

        if args.reverse {
            match builder_to_html(&content) {
                Ok(html) => println!("{}", html),
                Err(e) => {
                    eprintln!("✗ {} has errors:", file_path);
                    print_reverse_error(&e);
                    exit_code = 1;
                }
            }
        } else {
            match converter.convert(&content) {
                Ok(code) => println!("{}", code),
                Err(e) => {
                    eprintln!("✗ {} has errors:", file_path);
                    print_error(&e);
                    exit_code = 1;
                }
            }
        }
    }

    process::exit(exit_code);
}

fn read_input(path: &str) -> io::Result<String> {
    if path == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        fs::read_to_string(path)
    }
}

fn print_error(error: &ConvertError) {
    match error {
        ConvertError::InvalidHtml { message } => {
            eprintln!("  Invalid HTML:");
            eprintln!("    {}", message);
        }
        ConvertError::Parse { message } => {
            eprintln!("  Parse error:");
            eprintln!("    {}", message);
        }
        ConvertError::EmptyNode { message } => {
            eprintln!("  {}", message);
        }
        ConvertError::EmptyBody { message, node }
        | ConvertError::NoBody { message, node }
        | ConvertError::NoContent { message, node } => {
            eprintln!("  No content to convert ({}):", error.kind());
            eprintln!("    {}", message);
            eprintln!("    at {}", node);
        }
        ConvertError::UnknownNodeType { message, node } => {
            eprintln!("  Cannot convert node {}:", node);
            eprintln!("    {}", message);
        }
    }
}

fn print_reverse_error(error: &ReverseError) {
    match error {
        ReverseError::UnexpectedToken { position, .. }
        | ReverseError::UnterminatedString { position } => {
            eprintln!("  Syntax error at byte {}:", position);
            eprintln!("    {}", error);
        }
        ReverseError::IfExpression => {
            eprintln!("  {}", error);
            eprintln!("    Wrap conditional markup in a func() literal");
        }
        e => {
            eprintln!("  {}", e);
        }
    }
}
