//! Status/code table shared by the controller dialects.

use skiff_domain::Error;

/// One decoded controller error, before classification.
#[derive(Debug, Default)]
pub(crate) struct ServerError {
    pub code: Option<i64>,
    pub error_code: String,
    pub description: String,
}

pub(crate) fn classify(status: u16, error: ServerError) -> Error {
    let ServerError { code, error_code, description } = error;
    let message = description.clone();

    if status == 404 {
        return Error::ResourceNotFound { message };
    }

    match (code, error_code.as_str()) {
        (Some(1000), _) | (_, "CF-InvalidAuthToken") | (_, "invalid_token") => {
            return Error::InvalidToken { description };
        }
        (Some(10002), _) | (_, "CF-NotAuthenticated") => return Error::Unauthorized { message },
        (Some(10003), _) | (_, "CF-NotAuthorized") => return Error::Forbidden { message },
        (Some(10010), _) => return Error::ResourceNotFound { message },
        (Some(10008), _) | (_, "CF-UnprocessableEntity") => {
            return Error::UnprocessableEntity { message };
        }
        (Some(170002), _) | (_, "CF-NotStaged") => return Error::NotStaged { message },
        _ => {}
    }

    if error_code.ends_with("NotFound") {
        return Error::ResourceNotFound { message };
    }
    if error_code.ends_with("NameTaken") {
        return Error::NameTaken { message };
    }

    match status {
        400 => Error::BadRequest { message },
        401 => Error::Unauthorized { message },
        403 => Error::Forbidden { message },
        422 => Error::UnprocessableEntity { message },
        503 => Error::ServiceUnavailable { message },
        _ => {
            let code = if error_code.is_empty() {
                code.map(|c| c.to_string()).unwrap_or_default()
            } else {
                error_code
            };
            Error::Http { status, code, description }
        }
    }
}
