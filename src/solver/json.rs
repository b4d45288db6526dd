#![allow(non_snake_case)]
use crate::algebra::*;
use crate::solver::{ConicProgram, HipmSettings, SupportedConeT, VariableMap};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::io::Write;
use std::{fs::File, io, io::Read};

// Caller supplied data only.  The iterate is not stored, so a
// program read back starts from zero x, w and s.

#[derive(Serialize, Deserialize)]
#[serde(bound = "T: Serialize + DeserializeOwned")]
struct JsonProgramData<T: FloatT> {
    pub A: CscMatrix<T>,
    pub b: Vec<T>,
    pub c: Vec<T>,
    pub cones: Vec<SupportedConeT>,
    pub variables: VariableMap,
    #[serde(default)]
    pub settings: Option<HipmSettings<T>>,
}

impl<T> ConicProgram<T>
where
    T: FloatT + DeserializeOwned + Serialize,
{
    /// Writes the program data, and optionally solver settings, as JSON
    pub fn write_to_file(
        &self,
        file: &mut File,
        settings: Option<&HipmSettings<T>>,
    ) -> Result<(), io::Error> {
        let mut json_data = JsonProgramData {
            A: self.a().clone(),
            b: self.b().to_vec(),
            c: self.c().to_vec(),
            cones: self.cones().to_vec(),
            variables: self.variable_map().clone(),
            settings: settings.cloned(),
        };

        // infinite values can't be serialized
        if let Some(settings) = json_data.settings.as_mut() {
            sanitize_settings(settings);
        }

        let json = serde_json::to_string(&json_data)?;
        file.write_all(json.as_bytes())?;

        Ok(())
    }

    /// Reads a program written by [`write_to_file`](Self::write_to_file),
    /// together with the settings stored alongside it, if any.
    pub fn read_from_file(file: &mut File) -> Result<(Self, Option<HipmSettings<T>>), io::Error> {
        let mut buffer = String::new();
        file.read_to_string(&mut buffer)?;
        let mut json_data: JsonProgramData<T> = serde_json::from_str(&buffer)?;

        if let Some(settings) = json_data.settings.as_mut() {
            desanitize_settings(settings);
            settings
                .validate()
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        }

        let program = Self::with_variable_map(
            json_data.A,
            json_data.b,
            json_data.c,
            json_data.cones,
            json_data.variables,
        )
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        Ok((program, json_data.settings))
    }
}

fn sanitize_settings<T: FloatT>(settings: &mut HipmSettings<T>) {
    if settings.time_limit == f64::INFINITY {
        settings.time_limit = f64::MAX;
    }
}

fn desanitize_settings<T: FloatT>(settings: &mut HipmSettings<T>) {
    if settings.time_limit == f64::MAX {
        settings.time_limit = f64::INFINITY;
    }
}
