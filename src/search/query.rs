use crate::url::prefix_base;
use std::fmt;
use std::str::FromStr;

/// Default number of results requested per page
pub const DEFAULT_MAX_RESULTS: u32 = 100;

/// Catalog columns a query can be restricted to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchField {
    Title,
    Authors,
    Series,
    Year,
    Publisher,
    Isbn,
}

impl SearchField {
    /// All fields, in the order the catalog form lists them
    pub const ALL: [SearchField; 6] = [
        Self::Title,
        Self::Authors,
        Self::Series,
        Self::Year,
        Self::Publisher,
        Self::Isbn,
    ];

    fn code(self) -> char {
        match self {
            Self::Title => 't',
            Self::Authors => 'a',
            Self::Series => 's',
            Self::Year => 'y',
            Self::Publisher => 'p',
            Self::Isbn => 'i',
        }
    }

    /// The encoded query parameter, e.g. `columns%5B%5D=t`
    pub fn filter(self) -> String {
        format!("columns%5B%5D={}", self.code())
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Title => "title",
            Self::Authors => "authors",
            Self::Series => "series",
            Self::Year => "year",
            Self::Publisher => "publisher",
            Self::Isbn => "isbn",
        };
        f.write_str(name)
    }
}

impl FromStr for SearchField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown search field '{}'", s))
    }
}

/// Catalog sections a query can be restricted to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Libgen,
    Comics,
    Fiction,
    ScientificArticles,
    Magazines,
    FictionRussian,
    Standards,
}

impl Topic {
    /// All topics, in the order the catalog form lists them
    pub const ALL: [Topic; 7] = [
        Self::Libgen,
        Self::Comics,
        Self::Fiction,
        Self::ScientificArticles,
        Self::Magazines,
        Self::FictionRussian,
        Self::Standards,
    ];

    fn code(self) -> char {
        match self {
            Self::Libgen => 'l',
            Self::Comics => 'c',
            Self::Fiction => 'f',
            Self::ScientificArticles => 'a',
            Self::Magazines => 'm',
            Self::FictionRussian => 'r',
            Self::Standards => 's',
        }
    }

    /// The encoded query parameter, e.g. `topics%5B%5D=l`
    pub fn filter(self) -> String {
        format!("topics%5B%5D={}", self.code())
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Libgen => "libgen",
            Self::Comics => "comics",
            Self::Fiction => "fiction",
            Self::ScientificArticles => "scientific-articles",
            Self::Magazines => "magazines",
            Self::FictionRussian => "fiction-russian",
            Self::Standards => "standards",
        };
        f.write_str(name)
    }
}

impl FromStr for Topic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|topic| topic.to_string().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| format!("unknown topic '{}'", s))
    }
}

/// Field filter parameters for the selected fields, in catalog order
///
/// Duplicates in `fields` are ignored.
pub fn search_fields(fields: &[SearchField]) -> Vec<String> {
    SearchField::ALL
        .into_iter()
        .filter(|field| fields.contains(field))
        .map(SearchField::filter)
        .collect()
}

/// Topic filter parameters for the selected topics, in catalog order
pub fn search_categories(topics: &[Topic]) -> Vec<String> {
    Topic::ALL
        .into_iter()
        .filter(|topic| topics.contains(topic))
        .map(Topic::filter)
        .collect()
}

/// A catalog search request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub query: String,
    pub fields: Vec<SearchField>,
    pub topics: Vec<Topic>,
    pub max_results: u32,
    pub page: u32,
}

impl SearchQuery {
    /// A query over all fields and topics, first page, 100 results
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            fields: Vec::new(),
            topics: Vec::new(),
            max_results: DEFAULT_MAX_RESULTS,
            page: 1,
        }
    }

    #[must_use]
    pub fn with_fields(mut self, fields: impl IntoIterator<Item = SearchField>) -> Self {
        self.fields = fields.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_topics(mut self, topics: impl IntoIterator<Item = Topic>) -> Self {
        self.topics = topics.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// Builds the search URL against `base_url`
    ///
    /// # Example
    ///
    /// ```
    /// use catalog_mirror::search::{SearchField, SearchQuery};
    ///
    /// let url = SearchQuery::new("rust book")
    ///     .with_fields([SearchField::Title])
    ///     .to_url("https://libgen.li");
    /// assert!(url.starts_with("https://libgen.li/index.php?req=rust+book&columns%5B%5D=t&res=100"));
    /// ```
    pub fn to_url(&self, base_url: &str) -> String {
        let query: String = url::form_urlencoded::byte_serialize(self.query.as_bytes()).collect();

        let mut path = format!("index.php?req={}", query);
        for filter in search_fields(&self.fields)
            .into_iter()
            .chain(search_categories(&self.topics))
        {
            path.push('&');
            path.push_str(&filter);
        }
        path.push_str(&format!(
            "&res={}&covers=on&showch=on&gmode=on&filesuns=all&page={}&curtab=f&order=&ordermode=desc",
            self.max_results, self.page
        ));

        prefix_base(base_url, &path)
    }
}
