use std::collections::HashMap;

/// Database engines shown as drifting logo glyphs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Logo {
	PostgreSql,
	MySql,
	MongoDb,
	MsSql,
	Oracle,
}

impl Logo {
	pub const ALL: [Logo; 5] = [
		Logo::PostgreSql,
		Logo::MySql,
		Logo::MongoDb,
		Logo::MsSql,
		Logo::Oracle,
	];

	pub fn id(self) -> &'static str {
		match self {
			Logo::PostgreSql => "postgresql",
			Logo::MySql => "mysql",
			Logo::MongoDb => "mongodb",
			Logo::MsSql => "mssql",
			Logo::Oracle => "oracle",
		}
	}

	pub fn asset_path(self) -> String {
		format!("/images/{}.svg", self.id())
	}

	/// Outlined text drawn while the bitmap is unavailable.
	pub fn abbreviation(self) -> String {
		self.id().chars().take(3).collect::<String>().to_uppercase()
	}

	pub fn is_oversized(self) -> bool {
		matches!(self, Logo::MongoDb | Logo::Oracle)
	}

	/// Brand color the source image is recolored to before blitting.
	pub fn tint(self) -> Option<&'static str> {
		match self {
			Logo::Oracle => Some("#f80000"),
			_ => None,
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub enum LogoState<I> {
	Pending,
	Ready(I),
	/// Terminal: the logo keeps its text fallback for the session.
	Failed,
}

/// Per-identifier bitmap cache, alive as long as the component.
#[derive(Clone, Debug)]
pub struct LogoAtlas<I> {
	entries: HashMap<Logo, LogoState<I>>,
}

impl<I> Default for LogoAtlas<I> {
	fn default() -> Self {
		Self {
			entries: Logo::ALL.iter().map(|&l| (l, LogoState::Pending)).collect(),
		}
	}
}

impl<I> LogoAtlas<I> {
	pub fn image(&self, logo: Logo) -> Option<&I> {
		match self.entries.get(&logo) {
			Some(LogoState::Ready(image)) => Some(image),
			_ => None,
		}
	}

	pub fn is_pending(&self, logo: Logo) -> bool {
		matches!(self.entries.get(&logo), Some(LogoState::Pending) | None)
	}

	/// Records a finished load. Only pending entries change, so a failure is never retried.
	pub fn resolve(&mut self, logo: Logo, image: Option<I>) {
		let entry = self.entries.entry(logo).or_insert(LogoState::Pending);
		if matches!(entry, LogoState::Pending) {
			*entry = image.map_or(LogoState::Failed, LogoState::Ready);
		}
	}
}
