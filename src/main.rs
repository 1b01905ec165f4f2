fn main() {
    if let Err(err) = canvas_diagrams::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
