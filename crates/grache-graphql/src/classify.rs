use graphql_parser::query::{Definition, OperationDefinition, parse_query};

/// GraphQL operation type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

impl OperationKind {
    /// Lowercase keyword for log fields
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Mutation => "mutation",
            Self::Subscription => "subscription",
        }
    }
}

/// One operation found in a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub kind: OperationKind,
    /// Operation name, `None` for anonymous operations
    pub name: Option<String>,
}

/// Result of classifying a GraphQL document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Document parsed; every operation it defines, in document order
    Operations(Vec<Operation>),
    /// Document could not be parsed, with the parser's message
    Unparseable(String),
}

impl Classification {
    /// Whether the document must be treated as side-effecting
    ///
    /// Unparseable documents count as mutations: nothing can be said about
    /// them, so they are never served from or written to the cache.
    pub fn has_mutation(&self) -> bool {
        match self {
            Self::Operations(operations) => operations.iter().any(|op| op.kind == OperationKind::Mutation),
            Self::Unparseable(_) => true,
        }
    }

    /// Whether parsing failed
    pub const fn is_unparseable(&self) -> bool {
        matches!(self, Self::Unparseable(_))
    }

    /// Operations found in the document, empty when unparseable
    pub fn operations(&self) -> &[Operation] {
        match self {
            Self::Operations(operations) => operations,
            Self::Unparseable(_) => &[],
        }
    }
}

/// Parse a document and report the type of each operation it contains
///
/// Every definition is inspected, so a document mixing a query and a
/// mutation reports both. Fragment definitions are skipped; a document made
/// only of fragments yields no operations. Blank input is unparseable.
pub fn classify(document: &str) -> Classification {
    if document.trim().is_empty() {
        return Classification::Unparseable("empty document".to_owned());
    }

    let parsed = match parse_query::<&str>(document) {
        Ok(parsed) => parsed,
        Err(e) => return Classification::Unparseable(e.to_string()),
    };

    let operations = parsed
        .definitions
        .iter()
        .filter_map(|definition| match definition {
            Definition::Operation(operation) => Some(operation),
            Definition::Fragment(_) => None,
        })
        .map(|operation| match operation {
            OperationDefinition::SelectionSet(_) => Operation {
                kind: OperationKind::Query,
                name: None,
            },
            OperationDefinition::Query(query) => Operation {
                kind: OperationKind::Query,
                name: query.name.map(str::to_owned),
            },
            OperationDefinition::Mutation(mutation) => Operation {
                kind: OperationKind::Mutation,
                name: mutation.name.map(str::to_owned),
            },
            OperationDefinition::Subscription(subscription) => Operation {
                kind: OperationKind::Subscription,
                name: subscription.name.map(str::to_owned),
            },
        })
        .collect();

    Classification::Operations(operations)
}
