use fftt_core::{wav, Decoder, Encoder, Protocol, ProtocolVersion};
use std::io::Cursor;
use wasm_bindgen::prelude::*;

fn protocol_from(version: &str) -> Result<Protocol, JsValue> {
    version
        .parse::<ProtocolVersion>()
        .map(Protocol::new)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen]
pub struct WasmEncoder {
    inner: Encoder,
}

#[wasm_bindgen]
impl WasmEncoder {
    /// `version` is "v1" (20 Hz spacing) or "v2" (75 Hz spacing)
    #[wasm_bindgen(constructor)]
    pub fn new(version: &str) -> Result<WasmEncoder, JsValue> {
        Encoder::new(protocol_from(version)?)
            .map(|encoder| WasmEncoder { inner: encoder })
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Encode binary data into 16-bit audio samples
    /// Takes a Uint8Array and returns an Int16Array at 44100 Hz
    #[wasm_bindgen]
    pub fn encode(&mut self, data: &[u8]) -> Vec<i16> {
        self.inner.encode(data)
    }

    /// Encode binary data into a complete WAV file image
    #[wasm_bindgen(js_name = encodeWav)]
    pub fn encode_wav(&mut self, data: &[u8]) -> Result<Vec<u8>, JsValue> {
        let mut cursor = Cursor::new(Vec::new());
        self.inner
            .encode_to_wav(data, &mut cursor)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(cursor.into_inner())
    }

    #[wasm_bindgen(getter, js_name = sampleRate)]
    pub fn sample_rate(&self) -> u32 {
        self.inner.protocol().sample_rate
    }
}

#[wasm_bindgen]
pub struct WasmDecoder {
    inner: Decoder,
}

#[wasm_bindgen]
impl WasmDecoder {
    #[wasm_bindgen(constructor)]
    pub fn new(version: &str) -> Result<WasmDecoder, JsValue> {
        Decoder::new(protocol_from(version)?)
            .map(|decoder| WasmDecoder { inner: decoder })
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Decode 16-bit audio samples back to binary data
    /// Takes an Int16Array and returns a Uint8Array
    #[wasm_bindgen]
    pub fn decode(&mut self, samples: &[i16]) -> Vec<u8> {
        self.inner.decode(samples)
    }

    /// Decode a WAV file image (e.g. from a file input) back to binary data
    #[wasm_bindgen(js_name = decodeWav)]
    pub fn decode_wav(&mut self, bytes: &[u8]) -> Result<Vec<u8>, JsValue> {
        let waveform = wav::decode_wav(bytes).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(self.inner.decode_waveform(&waveform))
    }
}
