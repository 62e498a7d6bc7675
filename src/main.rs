use matf_reader::{ArrayData, DataElement, MatFile, MatReaderOptions, Matrix};
use std::env;

fn describe(matrix: &Matrix, indent: usize) {
    let pad = "  ".repeat(indent);
    let name = matrix.name().unwrap_or("<unnamed>");
    println!(
        "{}{} {:?} {:?}{}",
        pad,
        name,
        matrix.class(),
        matrix.shape(),
        if matrix.is_complex() { " complex" } else { "" }
    );
    match &matrix.data {
        ArrayData::Cell(cells) => {
            for cell in cells {
                describe(cell, indent + 1);
            }
        }
        ArrayData::Struct { field_names, .. } => {
            println!("{}  fields: {}", pad, field_names.join(", "));
        }
        _ => {
            if let Some(text) = matrix.text() {
                println!("{}  text: {:?}", pad, text);
            }
        }
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <path-to-mat-file> [--no-size-check]", args[0]);
        std::process::exit(1);
    }

    let mat_path = &args[1];
    let mut options = MatReaderOptions::default();
    if args.iter().any(|arg| arg == "--no-size-check") {
        options = options.check_sizes(false);
    }

    println!("Reading MAT file: {}", mat_path);
    println!("{}", "=".repeat(60));

    let mut file = match MatFile::open_with(mat_path, options) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("\nERROR: Failed to open MAT file");
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    };

    println!("\nHeader:");
    println!("  Descriptor: {}", file.header.descriptor);
    println!("  Version: {:#06x}", file.header.version);
    println!("  Byte order: {:?}", file.header.endianness);

    println!("\nElements:");
    let mut count = 0;
    for element in file.elements() {
        match element {
            Ok(DataElement::Matrix(matrix)) => describe(&matrix, 1),
            Ok(other) => println!("  {} element", other.kind_name()),
            Err(e) => {
                eprintln!("\nERROR: Failed to read element {}", count + 1);
                eprintln!("  {}", e);
                std::process::exit(1);
            }
        }
        count += 1;
    }
    file.close();

    println!("\n{}", "=".repeat(60));
    println!("{} top-level element(s)", count);
}
