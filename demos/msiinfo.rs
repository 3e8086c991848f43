use clap::{App, Arg};
use msi_metadata::ExtractOptions;

fn main() {
    let matches = App::new("msiinfo")
        .version("0.1")
        .about("Prints the product metadata of an MSI file")
        .arg(Arg::with_name("path").required(true))
        .arg(
            Arg::with_name("no-files")
                .long("no-files")
                .help("Skips the File table"),
        )
        .arg(
            Arg::with_name("no-features")
                .long("no-features")
                .help("Skips the Feature table"),
        )
        .arg(
            Arg::with_name("json")
                .long("json")
                .help("Prints the metadata as JSON"),
        )
        .arg(
            Arg::with_name("tables")
                .long("tables")
                .help("Lists the package's streams and table schemas"),
        )
        .get_matches();
    let path = matches.value_of("path").unwrap();

    if matches.is_present("tables") {
        let package = msi_metadata::open(path).expect("open package");
        for stream in package.streams() {
            match stream.strip_prefix("Table.") {
                Some(name) => match package.table_schema(name) {
                    Some(table) => {
                        println!("{name}");
                        for column in table.columns() {
                            println!(
                                "  {:>2} {:<24} {}",
                                column.ordinal(),
                                column.name(),
                                column.coltype()
                            );
                        }
                    }
                    None => println!("{name} (no schema)"),
                },
                None => println!("{stream} (stream)"),
            }
        }
        return;
    }

    let options = ExtractOptions::new()
        .files(!matches.is_present("no-files"))
        .features(!matches.is_present("no-features"));
    let metadata =
        msi_metadata::extract_path(path, options).expect("extract metadata");
    if matches.is_present("json") {
        let json = serde_json::to_string_pretty(&metadata).expect("json");
        println!("{json}");
        return;
    }

    let fields = [
        ("Product code", metadata.product_code()),
        ("Product name", metadata.product_name()),
        ("Version", metadata.product_version()),
        ("Publisher", metadata.publisher()),
        ("Upgrade code", metadata.upgrade_code()),
        ("Language", metadata.language()),
        ("Install dir", metadata.install_location()),
        ("Min OS", metadata.min_os_version()),
        ("Install", metadata.install_command()),
        ("Uninstall", metadata.uninstall_command()),
        ("SHA-256", metadata.sha256()),
        ("MD5", metadata.md5()),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            println!("{label:>12}: {value}");
        }
    }
    println!("{:>12}: {}", "Architecture", metadata.architecture());
    println!("{:>12}: {:.2}", "Size (MB)", metadata.size_mb());
    if let Some(files) = metadata.files() {
        println!("Files ({}):", files.len());
        for file in files {
            println!("  {file}");
        }
    }
    if let Some(features) = metadata.required_features() {
        println!("Features ({}):", features.len());
        for feature in features {
            println!("  {feature}");
        }
    }
}
