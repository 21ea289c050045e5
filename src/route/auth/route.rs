use argon2::{
	password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
	Argon2,
};
use axum::{
	body::Body,
	extract::State,
	http::{header, Response, StatusCode},
	response::{AppendHeaders, IntoResponse, Redirect},
};
use rand_core::OsRng;
use tera::Context;
use uuid::Uuid;

use crate::{
	extract::{Form, Session},
	flash::{Flashes, Level},
	session,
	view::Page,
	AppState, Database,
};

use super::{model, Error, RouteError};

/// Hashes a password with Argon2 and a freshly generated salt,
/// returning it in PHC string format.
pub fn hash_password(hasher: &Argon2, password: &str) -> Result<String, password_hash::Error> {
	let salt = SaltString::generate(&mut OsRng);

	Ok(hasher.hash_password(password.as_bytes(), &salt)?.to_string())
}

/// Checks a password against a PHC string produced by [`hash_password`].
pub fn verify_password(
	hasher: &Argon2,
	password: &str,
	hash: &str,
) -> Result<bool, password_hash::Error> {
	let hash = PasswordHash::new(hash)?;

	match hasher.verify_password(password.as_bytes(), &hash) {
		Ok(()) => Ok(true),
		Err(password_hash::Error::Password) => Ok(false),
		Err(e) => Err(e),
	}
}

/// Shows the registration form.
pub async fn register_form(page: Page) -> Result<Response<Body>, RouteError> {
	Ok(page.render("register.html", Context::new())?)
}

/// Registers a new account, then sends the client to the landing page.
pub async fn register(
	State(state): State<AppState>,
	flashes: Flashes,
	Form(input): Form<model::UserForm>,
) -> Result<impl IntoResponse, RouteError> {
	let existing = sqlx::query_as::<_, (String, String)>(
		r#"
			SELECT username, email FROM "user"
			WHERE username = ? OR email = ?
			LIMIT 1
		"#,
	)
	.bind(&input.username)
	.bind(&input.email)
	.fetch_optional(&state.database)
	.await?;

	if let Some((username, _)) = existing {
		return Err(if username == input.username {
			Error::UsernameTaken.into()
		} else {
			Error::EmailTaken.into()
		});
	}

	let hashed = hash_password(&state.hasher, &input.password).map_err(Error::PasswordHash)?;

	let user_id = insert_user(&state.database, &input.username, &input.email, &hashed).await?;

	tracing::info!(user_id, username = %input.username, "registered user");

	Ok((
		flashes.with(Level::Success, "Registration successful"),
		Redirect::to("/"),
	))
}

/// Inserts a user with an already hashed password, returning its id.
///
/// A unique constraint violation, such as one caused by a concurrent
/// registration, is reported as the matching `*Taken` error.
pub async fn insert_user(
	database: &Database,
	username: &str,
	email: &str,
	password: &str,
) -> Result<i64, RouteError> {
	let result = sqlx::query(r#"INSERT INTO "user" (username, email, password) VALUES (?, ?, ?)"#)
		.bind(username)
		.bind(email)
		.bind(password)
		.execute(database)
		.await
		.map_err(|e| match e {
			sqlx::Error::Database(ref d) if d.is_unique_violation() => {
				// SQLite names the failed column as `table.column`
				if d.message().contains("user.email") {
					Error::EmailTaken.into()
				} else {
					Error::UsernameTaken.into()
				}
			}
			e => RouteError::from(e),
		})?;

	Ok(result.last_insert_rowid())
}

/// Shows the login form.
pub async fn login_form(page: Page) -> Result<Response<Body>, RouteError> {
	Ok(page.render("login.html", Context::new())?)
}

/// Logs in to an account, setting a session cookie and sending the client
/// to their profile. Invalid credentials show the form again.
pub async fn login(
	State(state): State<AppState>,
	mut page: Page,
	Form(input): Form<model::LoginInput>,
) -> Result<Response<Body>, RouteError> {
	let user = sqlx::query_as::<_, model::User>(r#"SELECT * FROM "user" WHERE email = ?"#)
		.bind(&input.email)
		.fetch_optional(&state.database)
		.await?;

	let verified = match &user {
		Some(user) => verify_password(&state.hasher, &input.password, &user.password)
			.map_err(Error::PasswordHash)?,
		None => false,
	};

	let Some(user) = user.filter(|_| verified) else {
		tracing::info!(email = %input.email, "rejected login");

		page.flash(Level::Error, "Invalid credentials");

		let mut context = Context::new();
		context.insert("email", &input.email);

		return Ok(page
			.status(StatusCode::UNAUTHORIZED)
			.render("login.html", context)?);
	};

	let session_id = Uuid::new_v4();

	sqlx::query("INSERT INTO session (id, user_id, created_at) VALUES (?, ?, ?)")
		.bind(session_id)
		.bind(user.id)
		.bind(chrono::Utc::now())
		.execute(&state.database)
		.await?;

	tracing::info!(user_id = user.id, "logged in");

	let cookie = session::create_cookie(session_id);

	Ok((
		page.into_flashes()
			.with(Level::Success, "Logged in successfully"),
		AppendHeaders([(header::SET_COOKIE, cookie.to_string())]),
		Redirect::to("/profile"),
	)
		.into_response())
}

/// Logs out of the authenticated account.
pub async fn logout(
	State(database): State<Database>,
	flashes: Flashes,
	session: Session,
) -> Result<impl IntoResponse, RouteError> {
	sqlx::query("DELETE FROM session WHERE id = ?")
		.bind(session.id)
		.execute(&database)
		.await?;

	tracing::info!(user_id = session.user.id, "logged out");

	// Clear the session cookie
	Ok((
		flashes.with(Level::Success, "You have been logged out"),
		AppendHeaders([(header::SET_COOKIE, session::clear_cookie().to_string())]),
		Redirect::to("/"),
	))
}

/// Shows the authenticated user.
pub async fn profile(page: Page, session: Session) -> Result<Response<Body>, RouteError> {
	let mut context = Context::new();
	context.insert("user", &session.user);

	Ok(page.render("profile.html", context)?)
}
