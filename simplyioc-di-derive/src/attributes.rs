use syn::{Attribute, Error, ExprArray, ExprPath, LitStr, Meta, Token};

pub const COMPONENT: &str = "component";
pub const INJECT: &str = "inject";
pub const AUTOWIRED: &str = "autowired";

pub enum DefaultDefinition {
    Default,
    Expr(ExprPath),
}

pub struct FieldAttributes {
    pub default: Option<DefaultDefinition>,
}

impl TryFrom<&Attribute> for FieldAttributes {
    type Error = Error;

    fn try_from(value: &Attribute) -> Result<Self, Self::Error> {
        let mut default = None;
        value.parse_nested_meta(|meta| {
            if meta.path.is_ident("default") {
                if meta.input.peek(Token![=]) {
                    let value = meta.value()?;
                    let expr: LitStr = value.parse()?;
                    default = Some(DefaultDefinition::Expr(expr.parse()?));
                } else {
                    default = Some(DefaultDefinition::Default);
                }

                Ok(())
            } else {
                Err(meta.error("Unsupported field attribute!"))
            }
        })?;

        Ok(Self { default })
    }
}

#[derive(Default)]
pub struct InjectAttributes {
    pub name: Option<LitStr>,
}

impl TryFrom<&Attribute> for InjectAttributes {
    type Error = Error;

    fn try_from(value: &Attribute) -> Result<Self, Self::Error> {
        if let Meta::Path(_) = value.meta {
            return Ok(Self::default());
        }

        let mut name = None;
        value.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                name = Some(meta.value().and_then(|value| value.parse())?);
                Ok(())
            } else {
                Err(meta.error("Unsupported injection attribute!"))
            }
        })?;

        Ok(Self { name })
    }
}

#[derive(Default)]
pub struct ComponentAttributes {
    pub names: Option<ExprArray>,
    pub constructor: Option<ExprPath>,
    pub no_default_constructor: bool,
}

impl TryFrom<&Attribute> for ComponentAttributes {
    type Error = Error;

    fn try_from(value: &Attribute) -> Result<Self, Self::Error> {
        let mut result = Self::default();
        value.parse_nested_meta(|meta| {
            if meta.path.is_ident("names") {
                result.names = Some(meta.value().and_then(|value| value.parse())?);
            } else if meta.path.is_ident("constructor") {
                let expr: LitStr = meta.value()?.parse()?;
                result.constructor = Some(expr.parse()?);
            } else if meta.path.is_ident("no_default_constructor") {
                result.no_default_constructor = true;
            } else {
                return Err(meta.error("Unsupported component attribute!"));
            }

            Ok(())
        })?;

        if result.no_default_constructor && result.constructor.is_some() {
            return Err(Error::new_spanned(
                value,
                "Cannot use both constructor and no_default_constructor!",
            ));
        }

        Ok(result)
    }
}
