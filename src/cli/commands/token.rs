use clap::Args;
use serde_json::json;

use crate::auth::{generate_jwt, Claims};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config;

#[derive(Args, Debug)]
pub struct TokenArgs {
    #[arg(help = "Username the token identifies")]
    pub username: String,

    #[arg(long, help = "Mark the token holder as an administrator")]
    pub admin: bool,

    #[arg(long, help = "Signing secret (defaults to JWT_SECRET / configured secret)")]
    pub secret: Option<String>,
}

pub fn handle(args: TokenArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let secret = args
        .secret
        .unwrap_or_else(|| config::config().security.jwt_secret.clone());
    let claims = Claims::new(args.username, args.admin);
    let token = generate_jwt(&claims, &secret)?;

    match output_format {
        OutputFormat::Text => println!("{}", token),
        OutputFormat::Json => output_success(
            output_format,
            "Token generated",
            Some(json!({
                "token": token,
                "username": claims.sub,
                "isAdmin": claims.is_admin,
                "expiresAt": claims.exp
            })),
        )?,
    }
    Ok(())
}
