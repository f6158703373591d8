fn main() {
    env_logger::init();

    let mut fullscreen = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--fullscreen" | "-f" => fullscreen = true,
            other => {
                eprintln!("Unknown argument '{}'. Usage: kitty [--fullscreen]", other);
                std::process::exit(1);
            }
        }
    }

    if let Err(e) = kitty::run(fullscreen) {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}
