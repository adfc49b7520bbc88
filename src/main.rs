use args::ARGS;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = ARGS.path.as_ref().unwrap();

    let catalog = disassembler::catalog(&ARGS.arch)?;
    let bytes = disassembler::load_image(path)?;

    if bytes.is_empty() {
        log::warning!("Image '{}' is empty.", path.display());
    }

    if ARGS.pseudo {
        let nodes = log::time!(disassembler::decompile(catalog, &bytes, ARGS.offset));
        print!("{}", ast::fmt::render(&nodes));
    } else {
        for line in disassembler::InstructionStream::new(catalog, &bytes, ARGS.offset) {
            println!("{line}");
        }
    }

    Ok(())
}
