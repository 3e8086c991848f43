fn main() -> ::std::io::Result<()> {
    println!("Syntax: generate-headers <language> <filename>");
    println!("Supported languages: c, csharp (cs) (c#), python (py)");
    let mut args = ::std::env::args().skip(1);
    match args.next() {
        Some(lang) => msi_metadata_ffi::generate_headers(
            &lang,
            args.next().unwrap_or_default(),
        ),
        None => {
            println!("No language specified.");
            Ok(())
        }
    }
}
