use crate::app_data::AppData;
use crate::errors::InternalError;
use crate::stores::NewUser;
use crate::types::internal::Role;

/// Create an account from the command line and print its id
pub async fn create_user(
    app_data: &AppData,
    username: &str,
    password: &str,
    display_name: &str,
    role: &str,
) -> Result<String, InternalError> {
    let role: Role = role.parse()?;
    let conn = app_data.database.open().await?;

    let user_id = app_data
        .credential_store
        .create_user(
            &conn,
            NewUser {
                username: username.to_string(),
                password: password.to_string(),
                display_name: display_name.to_string(),
                role,
            },
        )
        .await?;

    println!("Created {} account '{}' ({})", role, username, user_id);

    Ok(user_id)
}
