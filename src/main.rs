//! Voluma — volumetric video player. Runs the cloud_player app.

use cloud_player::prelude::PlayerBuilder;

fn main() {
    let _ = dotenvy::dotenv();

    PlayerBuilder::new().window_title("Voluma").build().run();
}
