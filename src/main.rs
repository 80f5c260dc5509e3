use lumafield::Reveal;

fn main() {
    env_logger::init();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: lumafield <image>");
        std::process::exit(1);
    };

    if let Err(e) = Reveal::new(path).run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
