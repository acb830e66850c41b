#![allow(unused_imports)]

#[cfg(feature = "pyo3")]
pub(crate) use crate::pyo3::*;

pub(crate) use crate::error::{PlannerError, PlannerResult};
pub(crate) use crate::si;
pub(crate) use crate::traits::*;
pub(crate) use crate::uc;
pub(crate) use crate::utils;
pub(crate) use crate::utils::almost_eq;
pub(crate) use altrios_planner_macros::{planner_api, SerdeAPI};
pub(crate) use anyhow::{anyhow, bail, ensure, Context};
pub(crate) use easy_ext::ext;
pub(crate) use eng_fmt::FormatEng;
pub(crate) use serde::{Deserialize, Serialize};
pub(crate) use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
pub(crate) use std::ffi::OsStr;
pub(crate) use std::fmt;
pub(crate) use std::fs::File;
pub(crate) use std::path::{Path, PathBuf};
pub(crate) use std::str::FromStr;
pub(crate) use uom::ConstZero;
