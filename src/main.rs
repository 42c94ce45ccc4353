#[actix_web::main]
async fn main() -> std::io::Result<()> {
    peticao_server::run().await
}
