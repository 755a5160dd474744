//! Commands available without a library prefix.

use chrono::NaiveDateTime;

use crate::internal::shell::{
    Args, CommandSignature, DEFAULT_LIBRARY, LibraryBuilder, Param, ParamKind,
    kind::DATE_TIME_FORMAT,
};

/// Value bound to `data` when `DOSomethingOptional` is called without it.
pub const NO_DATA: &str = "No Data provided";

pub fn library() -> LibraryBuilder {
    LibraryBuilder::new(DEFAULT_LIBRARY)
        .command(
            CommandSignature::new("DoSomething")
                .param(Param::required("id", ParamKind::Int32))
                .param(Param::required("data", ParamKind::String)),
            do_something,
        )
        .command(
            CommandSignature::new("DoSomethingElse")
                .param(Param::required("date", ParamKind::DateTime)),
            do_something_else,
        )
        .command(
            CommandSignature::new("DOSomethingOptional")
                .param(Param::required("id", ParamKind::Int32))
                .param(Param::optional("data", ParamKind::String, NO_DATA)),
            do_something_optional,
        )
}

fn do_something(args: &Args) -> anyhow::Result<String> {
    let id: i32 = args.get(0)?;
    let data = args.str(1)?;
    Ok(format!(
        "I did something to the record Id {id} and save the data {data}"
    ))
}

fn do_something_else(args: &Args) -> anyhow::Result<String> {
    let date: NaiveDateTime = args.get(0)?;
    Ok(format!(
        "I did something else on {}",
        date.format(DATE_TIME_FORMAT)
    ))
}

fn do_something_optional(args: &Args) -> anyhow::Result<String> {
    let id: i32 = args.get(0)?;
    let data = args.str(1)?;
    if data == NO_DATA {
        return Ok(format!(
            "I did something to the record Id {id} but the optional parameter was not provided, so I saved the value '{data}'"
        ));
    }
    Ok(format!(
        "I did something to the record Id {id} and save the data '{data}'"
    ))
}
