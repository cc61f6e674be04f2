//! addresses inside hcl documents
//!
//! Terraform configuration writes addresses as plain hcl traversals, most notably in `moved` blocks:
//! ```hcl
//! moved {
//!   from = module.a["x"].aws_instance.web[0]
//!   to   = module.b.aws_instance.web
//! }
//! ```
//!
//! A traversal is turned into an [Address] by rendering it as address text and parsing that, so
//! traversals go through the same grammar as any other input.
use crate::address::{Address, Index};
use crate::error::SyntaxError;
use hcl::expr::UnaryOperator;
use hcl::{Expression, Operation, Traversal, TraversalOperator};
use hcl_edit::structure::{Body, Structure};
use indexmap::IndexMap;
use std::path::Path;

/// The address as an hcl traversal, e.g. `module.a["x"].data.foo.bar[0]`
pub fn to_traversal(address: &Address) -> Traversal {
    let type_is_root = address.module_path.is_root() && !address.is_data();
    let root = if !address.module_path.is_root() {
        "module"
    } else if address.is_data() {
        "data"
    } else {
        address.resource.resource_type.as_str()
    };

    let mut operators = Vec::new();
    for (position, module) in address.module_path.iter().enumerate() {
        if position > 0 {
            operators.push(get_attr("module"));
        }
        operators.push(get_attr(&module.name));
        operators.extend(index_operator(&module.index));
    }

    if address.is_data() && !address.module_path.is_root() {
        operators.push(get_attr("data"));
    }
    if !type_is_root {
        operators.push(get_attr(&address.resource.resource_type));
    }
    operators.push(get_attr(&address.resource.name));
    operators.extend(index_operator(&address.resource.index));

    Traversal::new(Expression::Variable(hcl::Variable::unchecked(root)), operators)
}

fn get_attr(name: &str) -> TraversalOperator {
    TraversalOperator::GetAttr(hcl::Identifier::unchecked(name))
}

fn index_operator(index: &Index) -> Option<TraversalOperator> {
    match index {
        Index::Absent => None,
        Index::Int(value) => Some(TraversalOperator::Index(Expression::Number(
            hcl::Number::from(*value),
        ))),
        Index::String(value) => Some(TraversalOperator::Index(Expression::String(
            value.clone(),
        ))),
    }
}

impl From<&Address> for Traversal {
    fn from(address: &Address) -> Self {
        to_traversal(address)
    }
}

impl TryFrom<&Traversal> for Address {
    type Error = HclError;

    fn try_from(traversal: &Traversal) -> Result<Self, Self::Error> {
        let Expression::Variable(root) = &traversal.expr else {
            return Err(HclError::UnsupportedTraversal(format!(
                "root must be a name, found {:?}",
                traversal.expr
            )));
        };

        let mut text = root.as_str().to_string();
        for operator in &traversal.operators {
            match operator {
                TraversalOperator::GetAttr(ident) => {
                    text.push('.');
                    text.push_str(ident.as_str());
                }
                TraversalOperator::Index(expr) => {
                    let index = index_from_expression(expr).ok_or_else(|| {
                        HclError::UnsupportedTraversal(format!("unsupported index {expr:?}"))
                    })?;
                    text.push_str(&index.to_string());
                }
                TraversalOperator::LegacyIndex(value) => {
                    let value = i64::try_from(*value).map_err(|_| {
                        HclError::UnsupportedTraversal(format!("index {value} out of range"))
                    })?;
                    text.push_str(&Index::Int(value).to_string());
                }
                other => {
                    return Err(HclError::UnsupportedTraversal(format!(
                        "unsupported operator {other:?}"
                    )))
                }
            }
        }

        tracing::debug!(%text, "traversal rendered as address");
        crate::parse(&text).map_err(|source| HclError::InvalidAddress { text, source })
    }
}

fn index_from_expression(expr: &Expression) -> Option<Index> {
    match expr {
        Expression::Number(number) => number.as_i64().map(Index::Int),
        Expression::String(value) => Some(Index::String(value.clone())),
        Expression::Operation(operation) => match operation.as_ref() {
            // `-1` is a negation of `1`
            Operation::Unary(unary) if matches!(unary.operator, UnaryOperator::Neg) => {
                match index_from_expression(&unary.expr)? {
                    Index::Int(value) => value.checked_neg().map(Index::Int),
                    _ => None,
                }
            }
            _ => None,
        },
        Expression::Parenthesis(inner) => index_from_expression(inner),
        _ => None,
    }
}

/// `moved { from = <from> to = <to> }`
pub fn moved_block(from: &Address, to: &Address) -> hcl::Block {
    hcl::Block::builder("moved")
        .add_attribute(("from", to_traversal(from)))
        .add_attribute(("to", to_traversal(to)))
        .build()
}

/// Moves declared in `moved` blocks, keyed by the address moved from
///
/// Keeps declaration order. An address can only be moved once and data resources can not be moved.
#[derive(Default, Debug)]
pub struct MovedBlocks {
    moves: IndexMap<Address, Address>,
}

impl MovedBlocks {
    pub fn insert(&mut self, from: Address, to: Address) -> Result<(), HclError> {
        for address in [&from, &to] {
            if address.is_data() {
                return Err(HclError::DataResourceMove(address.clone()));
            }
        }

        if self.moves.contains_key(&from) {
            return Err(HclError::DuplicateMove(from));
        }

        tracing::debug!(%from, %to, "move");
        self.moves.insert(from, to);
        Ok(())
    }

    /// Collects the `moved` blocks of an hcl body, other structures are ignored
    pub fn insert_body(&mut self, body: Body) -> Result<(), HclError> {
        for structure in body.into_iter() {
            let Structure::Block(block) = structure else {
                continue;
            };

            if block.ident.value().as_str() != "moved" {
                continue;
            }

            let from = moved_attribute(&block, "from")?;
            let to = moved_attribute(&block, "to")?;
            self.insert(from, to)?;
        }

        Ok(())
    }

    pub fn load_file(&mut self, file_path: &Path) -> Result<(), HclError> {
        let file_path = file_path.canonicalize()?;
        tracing::info!(path=%file_path.display(), "loading file");

        let file_contents = std::fs::read_to_string(&file_path)?;
        let body = hcl_edit::parser::parse_body(&file_contents)?;

        self.insert_body(body)
    }

    pub fn get(&self, from: &Address) -> Option<&Address> {
        self.moves.get(from)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Address, &Address)> {
        self.moves.iter()
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Renders all moves as `moved` blocks
    pub fn to_hcl_string(&self) -> Result<String, HclError> {
        let body = self
            .moves
            .iter()
            .fold(hcl::Body::builder(), |body, (from, to)| {
                body.add_block(moved_block(from, to))
            })
            .build();

        Ok(hcl::format::to_string(&body)?)
    }
}

impl std::str::FromStr for MovedBlocks {
    type Err = HclError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut moved_blocks = Self::default();
        moved_blocks.insert_body(hcl_edit::parser::parse_body(s)?)?;
        Ok(moved_blocks)
    }
}

fn moved_attribute(
    block: &hcl_edit::structure::Block,
    key: &'static str,
) -> Result<Address, HclError> {
    let attribute = block
        .body
        .attributes()
        .find(|attribute| attribute.key.value().as_str() == key)
        .ok_or(HclError::MissingAttribute(key))?;

    let expression: Expression = attribute.value.clone().into();
    match expression {
        Expression::Traversal(traversal) => Address::try_from(traversal.as_ref()),
        other => Err(HclError::UnsupportedTraversal(format!(
            "`{key}` must be a resource address, found {other:?}"
        ))),
    }
}

#[derive(thiserror::Error, Debug)]
pub enum HclError {
    #[error("IO error")]
    IoError(#[from] std::io::Error),
    #[error("Unable to parse hcl file")]
    HclParseFailed(#[from] hcl_edit::parser::Error),
    #[error("Unable to format hcl")]
    HclFormatFailed(#[from] hcl::Error),
    #[error("traversal is not an address: {0}")]
    UnsupportedTraversal(String),
    #[error("invalid address `{text}`")]
    InvalidAddress {
        text: String,
        #[source]
        source: SyntaxError,
    },
    #[error("moved block is missing attribute `{0}`")]
    MissingAttribute(&'static str),
    #[error("`{0}` is moved more than once")]
    DuplicateMove(Address),
    #[error("data resource `{0}` can not be moved")]
    DataResourceMove(Address),
}
