#![warn(unused_extern_crates)]

use dractrlplugin::dractrl_plugin;

#[tokio::main]
async fn main() {
    let res = dractrl_plugin().await;

    match res {
        Ok(_) => (),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
