use async_trait::async_trait;
use shopwright_engine::flows::{FlowError, OtpProvider};
use std::io::{self, Write};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Print `label` to stderr and read one trimmed line from stdin.
pub async fn ask(label: &str) -> io::Result<String> {
    eprint!("{}: ", label);
    io::stderr().flush()?;

    let mut line = String::new();
    let read = BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
    if read == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed"));
    }
    Ok(line.trim().to_string())
}

/// Asks for the OTP on the terminal once the flow has requested it.
pub struct StdinOtp;

#[async_trait]
impl OtpProvider for StdinOtp {
    async fn otp(&self) -> Result<String, FlowError> {
        let code = ask("OTP sent to your phone")
            .await
            .map_err(|e| FlowError::Otp(e.to_string()))?;
        if code.is_empty() {
            return Err(FlowError::Otp("no OTP entered".into()));
        }
        Ok(code)
    }
}
