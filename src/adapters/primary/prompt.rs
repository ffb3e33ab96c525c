/*
Copyright 2024 San Francisco Compute Company

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

//! Interactive upload credential prompt

use crate::domain::UploadAuth;
use ::console::Term;
use std::io::{self, Write};

fn ask<W, F>(output: &mut W, question: &str, read: &mut F) -> io::Result<String>
where
    W: Write,
    F: FnMut() -> io::Result<String>,
{
    write!(output, "{question}")?;
    output.flush()?;
    Ok(read()?.trim_end_matches(['\r', '\n']).to_string())
}

/// Ask for the auth type, then the matching secret(s)
///
/// Anything other than `basic` is treated as bearer. The auth type and
/// username come from `read_line`; the password and token come from
/// `read_secret` and are taken as typed. Empty answers resolve to
/// [`UploadAuth::None`].
pub fn prompt_upload_auth<W, L, S>(
    output: &mut W,
    mut read_line: L,
    mut read_secret: S,
) -> io::Result<UploadAuth>
where
    W: Write,
    L: FnMut() -> io::Result<String>,
    S: FnMut() -> io::Result<String>,
{
    writeln!(output, "\nUpload Authentication")?;
    let auth_type = ask(output, "Auth type (bearer/basic) [bearer]: ", &mut read_line)?
        .trim()
        .to_lowercase();

    if auth_type == "basic" {
        let username = ask(output, "Username: ", &mut read_line)?.trim().to_string();
        let password = ask(output, "Password: ", &mut read_secret)?;
        writeln!(output)?;
        Ok(UploadAuth::resolve(None, Some(username), Some(password)))
    } else {
        let token = ask(output, "Bearer token: ", &mut read_secret)?;
        writeln!(output)?;
        Ok(UploadAuth::resolve(Some(token), None, None))
    }
}

/// Prompt on the controlling terminal with the password or token hidden
pub fn prompt_upload_auth_on_terminal() -> io::Result<UploadAuth> {
    let term = Term::stdout();
    prompt_upload_auth(
        &mut io::stdout(),
        || term.read_line(),
        || term.read_secure_line(),
    )
}
