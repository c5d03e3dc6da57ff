#[actix_web::main]
async fn main() -> std::io::Result<()> {
    studymate_lib::run().await
}
